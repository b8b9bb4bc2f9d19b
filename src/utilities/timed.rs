use std::time::Instant;

/// Logs the elapsed time of a scope at DEBUG level when dropped.
pub(crate) struct Timed
{
    name: &'static str,
    start: Instant,
}

impl Timed
{
    pub(crate) fn debug(name: &'static str) -> Self
    {
        log::trace!("{}...", name);
        Self { name, start: Instant::now() }
    }
}

impl Drop for Timed
{
    fn drop(&mut self) {
        log::debug!("{}: {:.3?}", self.name, self.start.elapsed());
    }
}
