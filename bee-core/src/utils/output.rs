use std::io::Write;
use std::sync::{Arc, RwLock};

/// Destination of everything a running program prints.
pub trait OutputEmitterIO {
    fn emit_output(&self, text: &str);
}

#[derive(Debug, Clone, Copy)]
pub struct StdoutEmitterIO;

impl OutputEmitterIO for StdoutEmitterIO {
    fn emit_output(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();

        // A closed stdout must not abort the program being interpreted.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

/// Collects output in memory.
#[derive(Debug, Default, Clone)]
pub struct VectorOutputEmitterIO {
    pub output: Arc<RwLock<String>>
}

impl VectorOutputEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> String {
        let mut output = self.write_lock();
        std::mem::take(&mut *output)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, String> {
        self.output.write().expect("Output lock poisoned")
    }
}

impl OutputEmitterIO for VectorOutputEmitterIO {
    fn emit_output(&self, text: &str) {
        let mut output = self.write_lock();

        output.push_str(text);
    }
}
