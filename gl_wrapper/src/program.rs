use std::ffi::c_char;

use gl::types::GLuint;

use crate::shader::{
    all_stages, info_log_text, ShaderError, ShaderKind, ShaderStage, INFO_LOG_LEN,
};

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages and links them. The stages are deleted once linking
    /// is done, whatever its outcome.
    ///
    /// Both stages are always compiled. When both fail the error is
    /// [`ShaderError::Stages`] carrying each compile log.
    pub fn build(self) -> Result<Program, ShaderError> {
        let stages = all_stages(vec![
            ShaderStage::compile(ShaderKind::Vertex, self.vert),
            ShaderStage::compile(ShaderKind::Fragment, self.frag),
        ])?;

        Program::link(&stages)
    }
}

#[derive(Debug)]
pub struct Program {
    id: GLuint,
}

impl Program {
    /// A program object with nothing attached or linked.
    pub fn empty() -> Self {
        let id = unsafe { gl::CreateProgram() };

        Self { id }
    }

    /// Attaches `stages` in order and links them.
    ///
    /// With no stages the empty program is returned as is. Stages are neither
    /// detached nor deleted here.
    pub fn link(stages: &[ShaderStage]) -> Result<Self, ShaderError> {
        let program = Self::empty();

        if stages.is_empty() {
            return Ok(program);
        }

        let mut success: i32 = 0;

        unsafe {
            for stage in stages {
                gl::AttachShader(program.id, stage.id());
            }

            gl::LinkProgram(program.id);
            gl::GetProgramiv(program.id, gl::LINK_STATUS, (&mut success) as *mut i32);
        }

        if success != gl::TRUE as i32 {
            let mut buf = [0_u8; INFO_LOG_LEN];

            unsafe {
                gl::GetProgramInfoLog(
                    program.id,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
            }

            return Err(ShaderError::Linking(info_log_text(&buf)));
        }

        log::debug!("linked program {} from {} stages", program.id, stages.len());

        Ok(program)
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        log::trace!("deleting program {}", self.id);
        unsafe { gl::DeleteProgram(self.id) }
    }
}
