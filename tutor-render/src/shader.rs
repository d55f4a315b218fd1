//! WGSL shader sources and checked compilation.
//!
//! Every pipeline ships a built-in WGSL module. A shader directory can
//! override it: `<dir>/<name>.wgsl` is read from disk instead.
//!
//! wgpu reports shader and pipeline errors asynchronously through the
//! device error handler; [`validated`] wraps creation in a validation
//! error scope so those errors come back as a [`ShaderError`] instead.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use wgpu::{Device, ErrorFilter, ShaderModule, ShaderModuleDescriptor};

/// Built-in module for the triangle pipeline.
pub const TRIANGLE_WGSL: &str = include_str!("shaders/triangle.wgsl");
/// Built-in module for the text pipeline.
pub const TEXT_WGSL: &str = include_str!("shaders/text.wgsl");

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Error opening {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{name}: compilation failed: {message}")]
    Compile { name: String, message: String },
    #[error("{label}: pipeline creation failed: {message}")]
    Link { label: String, message: String },
}

/// Where a shader's code came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShaderOrigin {
    BuiltIn,
    File(PathBuf),
}

/// WGSL code for one pipeline, ready to compile.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    name: String,
    origin: ShaderOrigin,
    code: Cow<'static, str>,
}

impl ShaderSource {
    pub fn builtin(name: &str, code: &'static str) -> Self {
        Self {
            name: name.to_string(),
            origin: ShaderOrigin::BuiltIn,
            code: Cow::Borrowed(code),
        }
    }

    /// Read `<dir>/<name>.wgsl`, or fall back to `builtin` when no
    /// directory is configured.
    pub fn load(dir: Option<&Path>, name: &str, builtin: &'static str) -> Result<Self, ShaderError> {
        let Some(dir) = dir else {
            return Ok(Self::builtin(name, builtin));
        };

        let path = dir.join(format!("{name}.wgsl"));
        let code = std::fs::read_to_string(&path).map_err(|source| ShaderError::Read {
            path: path.clone(),
            source,
        })?;
        debug!("Read shader {name} from {}", path.display());

        Ok(Self {
            name: name.to_string(),
            origin: ShaderOrigin::File(path),
            code: Cow::Owned(code),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &ShaderOrigin {
        &self.origin
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Compile into a shader module, surfacing WGSL errors.
    pub fn compile(&self, device: &Device) -> Result<ShaderModule, ShaderError> {
        let name = self.display_name();
        validated(
            device,
            || {
                device.create_shader_module(ShaderModuleDescriptor {
                    label: Some(&self.name),
                    source: wgpu::ShaderSource::Wgsl(self.code.clone()),
                })
            },
            |message| ShaderError::Compile {
                name: name.clone(),
                message,
            },
        )
    }

    fn display_name(&self) -> String {
        match &self.origin {
            ShaderOrigin::BuiltIn => format!("{} (built-in)", self.name),
            ShaderOrigin::File(path) => path.display().to_string(),
        }
    }
}

/// Run `create` inside a validation error scope.
///
/// Returns the created object, or the first validation error mapped
/// through `on_error`.
pub fn validated<T>(
    device: &Device,
    create: impl FnOnce() -> T,
    on_error: impl FnOnce(String) -> ShaderError,
) -> Result<T, ShaderError> {
    device.push_error_scope(ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(on_error(err.to_string())),
        None => Ok(value),
    }
}

// ===================================================================
// Tests
// ===================================================================
