use std::io::{self, Write};

/// Copy-through writer: every write goes to each live sink.
///
/// A sink that fails is reported once and dropped so the others keep receiving
/// output, the way `tee` keeps writing files after its stdout goes away.
pub(crate) struct Tee<'a> {
    sinks: Vec<(&'static str, &'a mut dyn Write)>,
}

impl Default for Tee<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Tee<'a> {
    pub(crate) fn new() -> Self {
        Tee { sinks: Vec::new() }
    }

    pub(crate) fn with(mut self, name: &'static str, sink: &'a mut dyn Write) -> Self {
        self.sinks.push((name, sink));
        self
    }

    #[cfg(test)]
    pub(crate) fn live_sinks(&self) -> usize {
        self.sinks.len()
    }

    fn for_each_sink(&mut self, mut op: impl FnMut(&mut dyn Write) -> io::Result<()>) {
        self.sinks.retain_mut(|(name, sink)| match op(&mut **sink) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Warning: stopped writing to {name}: {e}");
                false
            }
        });
    }
}

impl Write for Tee<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.for_each_sink(|sink| sink.write_all(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.for_each_sink(|sink| sink.flush());
        Ok(())
    }
}
