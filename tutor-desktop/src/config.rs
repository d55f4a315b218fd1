//! Command-line configuration.
//!
//! ```text
//! tutor-desktop [triangle|intro|text] [FONT] [--shaders DIR] [--no-vsync]
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Font used by the text demo when none is given.
pub const DEFAULT_FONT: &str = "../font/FreeSans.ttf";

pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;

pub const USAGE: &str = "\
usage: tutor-desktop [triangle|intro|text] [FONT] [--shaders DIR] [--no-vsync]

  triangle        rotating, sliding color triangle (default)
  intro           static blue triangle
  text            texture atlas text rendering, using FONT
                  (default ../font/FreeSans.ttf)

  --shaders DIR   read <DIR>/triangle.wgsl and <DIR>/text.wgsl instead of
                  the built-in shaders
  --no-vsync      present without waiting for vertical blank
  -h, --help      print this message";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown demo '{0}' (expected triangle, intro or text)")]
    UnknownDemo(String),
    #[error("Option {0} requires a value")]
    MissingValue(&'static str),
    #[error("Unknown option '{0}'")]
    UnknownOption(String),
    #[error("Unexpected argument '{0}'")]
    Unexpected(String),
}

/// Which tutorial program to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Demo {
    /// Static blue triangle.
    Intro,
    /// Triangle with per-vertex colors and an animated transform.
    #[default]
    Triangle,
    /// Sample lines of text drawn from glyph atlases.
    Text,
}

impl Demo {
    pub fn title(self) -> &'static str {
        match self {
            Demo::Intro => "My First Triangle",
            Demo::Triangle => "My Transformed Triangle",
            Demo::Text => "Texture atlas text",
        }
    }

    /// Whether the demo changes every frame and needs continuous redraws.
    pub fn is_animated(self) -> bool {
        matches!(self, Demo::Triangle)
    }
}

impl FromStr for Demo {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intro" => Ok(Demo::Intro),
            "triangle" => Ok(Demo::Triangle),
            "text" => Ok(Demo::Text),
            other => Err(ConfigError::UnknownDemo(other.to_string())),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Demo::Intro => "intro",
            Demo::Triangle => "triangle",
            Demo::Text => "text",
        };
        f.write_str(name)
    }
}

/// Everything the app needs to start a demo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub demo: Demo,
    pub font_path: PathBuf,
    /// Directory to load WGSL files from; built-in sources when `None`.
    pub shader_dir: Option<PathBuf>,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo: Demo::default(),
            font_path: PathBuf::from(DEFAULT_FONT),
            shader_dir: None,
            vsync: true,
        }
    }
}

/// Result of parsing the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help,
}

impl Config {
    /// Parse arguments, excluding the program name.
    pub fn from_args<I, S>(args: I) -> Result<Invocation, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut positional = 0;
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "--shaders" => {
                    let dir = args.next().ok_or(ConfigError::MissingValue("--shaders"))?;
                    config.shader_dir = Some(PathBuf::from(dir));
                }
                "--no-vsync" => config.vsync = false,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownOption(flag.to_string()));
                }
                _ => {
                    match positional {
                        0 => config.demo = arg.parse()?,
                        1 => config.font_path = PathBuf::from(&arg),
                        _ => return Err(ConfigError::Unexpected(arg.clone())),
                    }
                    positional += 1;
                }
            }
        }

        Ok(Invocation::Run(config))
    }
}

// ===================================================================
// Tests
// ===================================================================
