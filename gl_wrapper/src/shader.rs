use std::ffi::{c_char, CString};
use std::fmt::{Display, Formatter};

use gl::types::{GLenum, GLuint};
use thiserror::Error;

/// Size of the buffer info logs are read into, terminator included.
pub(crate) const INFO_LOG_LEN: usize = 512;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl_enum(&self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A compiled shader stage.
///
/// The stage is deleted when the guard is dropped. [`crate::program::Program::link`]
/// borrows the stages it attaches, so a stage cannot be released before linking
/// has finished.
#[derive(Debug)]
pub struct ShaderStage {
    id: GLuint,
    kind: ShaderKind,
}

impl ShaderStage {
    pub fn compile(kind: ShaderKind, source: &str) -> Result<Self, ShaderError> {
        let source = CString::new(source).map_err(|_| ShaderError::InvalidSource(kind))?;
        let mut success: i32 = 0;

        let stage = unsafe {
            let id = gl::CreateShader(kind.gl_enum());

            gl::ShaderSource(
                id,
                1,
                (&source.as_ptr()) as *const *const c_char,
                std::ptr::null(),
            );

            gl::CompileShader(id);
            gl::GetShaderiv(id, gl::COMPILE_STATUS, (&mut success) as *mut i32);

            Self { id, kind }
        };

        if success != gl::TRUE as i32 {
            let mut buf = [0_u8; INFO_LOG_LEN];

            unsafe {
                gl::GetShaderInfoLog(
                    stage.id,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
            }

            return Err(ShaderError::Compilation {
                kind,
                log: info_log_text(&buf),
            });
        }

        log::debug!("compiled {kind} shader {}", stage.id);

        Ok(stage)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for ShaderStage {
    fn drop(&mut self) {
        log::trace!("deleting {} shader {}", self.kind, self.id);
        unsafe { gl::DeleteShader(self.id) }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{0} shader source contains a nul byte")]
    InvalidSource(ShaderKind),
    #[error("{kind} shader compilation failed:\n{log}")]
    Compilation { kind: ShaderKind, log: String },
    #[error("program linking failed:\n{0}")]
    Linking(String),
    #[error("{}", join_errors(.0))]
    Stages(Vec<ShaderError>),
}

impl ShaderError {
    /// The individual failures, with [`ShaderError::Stages`] flattened.
    pub fn failures(&self) -> Vec<&ShaderError> {
        match self {
            ShaderError::Stages(errors) => errors.iter().flat_map(|e| e.failures()).collect(),
            e => vec![e],
        }
    }
}

fn join_errors(errors: &[ShaderError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collects every stage result, so that each failing stage gets reported and
/// not only the first one.
pub(crate) fn all_stages<T>(
    results: Vec<Result<T, ShaderError>>,
) -> Result<Vec<T>, ShaderError> {
    let mut stages = Vec::with_capacity(results.len());
    let mut errors = Vec::new();

    for res in results {
        match res {
            Ok(stage) => stages.push(stage),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => Ok(stages),
        1 => Err(errors.remove(0)),
        _ => Err(ShaderError::Stages(errors)),
    }
}

/// Turns a driver filled info log buffer into text.
///
/// The text ends at the first nul and never exceeds `INFO_LOG_LEN - 1` bytes.
pub(crate) fn info_log_text(buf: &[u8]) -> String {
    let buf = &buf[..buf.len().min(INFO_LOG_LEN - 1)];
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let mut buf = [0_u8; INFO_LOG_LEN];
        let msg = b"0:3(1): error: syntax error\n";
        buf[..msg.len()].copy_from_slice(msg);

        assert_eq!(info_log_text(&buf), "0:3(1): error: syntax error");
    }

    #[test]
    fn info_log_is_bounded() {
        let buf = [b'x'; INFO_LOG_LEN];

        assert_eq!(info_log_text(&buf).len(), 511);
    }

    #[test]
    fn info_log_of_empty_buffer() {
        assert_eq!(info_log_text(&[0; INFO_LOG_LEN]), "");
        assert_eq!(info_log_text(&[]), "");
    }

    #[test]
    fn info_log_invalid_utf8() {
        let buf = [b'o', b'k', 0xff, 0];

        assert_eq!(info_log_text(&buf), "ok\u{fffd}");
    }

    #[test]
    fn kind_maps_to_gl() {
        assert_eq!(ShaderKind::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderKind::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn errors_are_never_empty() {
        let err = ShaderError::Compilation {
            kind: ShaderKind::Fragment,
            log: String::new(),
        };

        assert_eq!(err.to_string(), "fragment shader compilation failed:\n");
        assert!(!ShaderError::Linking(String::new()).to_string().is_empty());
    }

    fn compile_error(kind: ShaderKind, log: &str) -> ShaderError {
        ShaderError::Compilation {
            kind,
            log: log.to_string(),
        }
    }

    #[test]
    fn all_stages_ok() {
        let stages = all_stages(vec![Ok(1), Ok(2)]).unwrap();

        assert_eq!(stages, vec![1, 2]);
    }

    #[test]
    fn single_failure_is_kept_as_is() {
        let err = all_stages(vec![
            Err(compile_error(ShaderKind::Vertex, "0:1: bad vertex")),
            Ok(()),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ShaderError::Compilation {
                kind: ShaderKind::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn every_failing_stage_is_reported() {
        let err = all_stages::<()>(vec![
            Err(compile_error(ShaderKind::Vertex, "0:1: bad vertex")),
            Err(compile_error(ShaderKind::Fragment, "0:2: bad fragment")),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "vertex shader compilation failed:\n0:1: bad vertex\n\
             fragment shader compilation failed:\n0:2: bad fragment"
        );

        let kinds: Vec<_> = err
            .failures()
            .into_iter()
            .map(|e| match e {
                ShaderError::Compilation { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![Some(ShaderKind::Vertex), Some(ShaderKind::Fragment)]);
    }

    #[test]
    fn nul_in_source_is_rejected_before_gl() {
        let err = ShaderStage::compile(ShaderKind::Vertex, "void main() {}\0").unwrap_err();

        assert!(matches!(err, ShaderError::InvalidSource(ShaderKind::Vertex)));
    }
}
