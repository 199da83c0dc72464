//! OpenCL programs.

use std::ffi::CString;
use ocl_core::{self, DeviceId, Program as ProgramCore, ProgramInfo, ProgramInfoResult};
use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::Program;


/// An OpenCL program object.
#[derive(Debug)]
pub struct ClProgram {
    core: ProgramCore,
    devices: Vec<DeviceId>,
    source: String,
    built: bool,
}

impl ClProgram {
    pub(crate) fn new(core: ProgramCore, devices: Vec<DeviceId>, source: String) -> ClProgram {
        ClProgram { core, devices, source, built: false }
    }

    /// Returns the underlying program.
    pub fn as_core(&self) -> &ProgramCore {
        &self.core
    }
}

impl Program for ClProgram {
    fn source(&self) -> &str {
        &self.source
    }

    fn build(&mut self, options: &str) -> OclResult<()> {
        let options = CString::new(options)
            .map_err(|_| OclError::from("build options contain a nul byte"))?;

        match ocl_core::build_program(&self.core, Some(&self.devices), &options, None, None) {
            Ok(()) => {
                self.built = true;
                Ok(())
            },
            Err(err) => {
                self.built = false;
                Err(OclError::Build(err.to_string()))
            },
        }
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn kernel_names(&self) -> OclResult<Vec<String>> {
        if !self.built {
            return Err("program has not been built".into());
        }
        match ocl_core::get_program_info(&self.core, ProgramInfo::KernelNames)? {
            ProgramInfoResult::KernelNames(names) => Ok(names.split(';')
                .filter(|n| !n.is_empty())
                .map(str::to_owned)
                .collect()),
            other => Err(format!("unexpected program info result: {}", other).into()),
        }
    }
}
