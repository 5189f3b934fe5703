//! Resolution of the GL entry points for the current context.

use std::ffi::{c_void, CStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("OpenGL function {0} could not be resolved")]
    MissingFunction(&'static str),
}

/// Loads every GL function through `loader` and checks that the ones this crate
/// calls were resolved. The context must be current.
pub fn load_with<F>(loader: F) -> Result<(), LoaderError>
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(loader);

    match missing_function(&required_functions()) {
        Some(name) => Err(LoaderError::MissingFunction(name)),
        None => Ok(()),
    }
}

fn required_functions() -> [(&'static str, bool); 28] {
    [
        ("glGetString", gl::GetString::is_loaded()),
        ("glCreateShader", gl::CreateShader::is_loaded()),
        ("glShaderSource", gl::ShaderSource::is_loaded()),
        ("glCompileShader", gl::CompileShader::is_loaded()),
        ("glGetShaderiv", gl::GetShaderiv::is_loaded()),
        ("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded()),
        ("glDeleteShader", gl::DeleteShader::is_loaded()),
        ("glCreateProgram", gl::CreateProgram::is_loaded()),
        ("glAttachShader", gl::AttachShader::is_loaded()),
        ("glLinkProgram", gl::LinkProgram::is_loaded()),
        ("glGetProgramiv", gl::GetProgramiv::is_loaded()),
        ("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded()),
        ("glDeleteProgram", gl::DeleteProgram::is_loaded()),
        ("glUseProgram", gl::UseProgram::is_loaded()),
        ("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
        ("glBindVertexArray", gl::BindVertexArray::is_loaded()),
        ("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded()),
        ("glGenBuffers", gl::GenBuffers::is_loaded()),
        ("glBindBuffer", gl::BindBuffer::is_loaded()),
        ("glBufferData", gl::BufferData::is_loaded()),
        ("glDeleteBuffers", gl::DeleteBuffers::is_loaded()),
        ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded()),
        ("glEnableVertexAttribArray", gl::EnableVertexAttribArray::is_loaded()),
        ("glViewport", gl::Viewport::is_loaded()),
        ("glClearColor", gl::ClearColor::is_loaded()),
        ("glClear", gl::Clear::is_loaded()),
        ("glDrawArrays", gl::DrawArrays::is_loaded()),
        ("glPolygonMode", gl::PolygonMode::is_loaded()),
    ]
}

fn missing_function(functions: &[(&'static str, bool)]) -> Option<&'static str> {
    functions
        .iter()
        .find(|(_, loaded)| !loaded)
        .map(|(name, _)| *name)
}

/// Driver identification strings, as reported by `glGetString`.
#[derive(Debug, Clone)]
pub struct DriverInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
}

impl DriverInfo {
    pub fn query() -> Self {
        Self {
            vendor: gl_string(gl::VENDOR),
            renderer: gl_string(gl::RENDERER),
            version: gl_string(gl::VERSION),
        }
    }
}

fn gl_string(name: gl::types::GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };

    if ptr.is_null() {
        return String::from("unknown");
    }

    unsafe { CStr::from_ptr(ptr as *const _) }
        .to_string_lossy()
        .into_owned()
}
