//! Process-wide generator handle.
//!
//! Services that prefer not to thread a [`Generator`] through their call
//! graph can use [`shared_generator`]. It builds the handle from the
//! environment on first use; racing first callers all observe the same
//! handle. A configuration failure is returned to the caller and the next
//! call tries again.

use tokio::sync::OnceCell;

use crate::error::GenerationError;
use crate::generate::Generator;

static SHARED: OnceCell<Generator> = OnceCell::const_new();

/// The process-wide generator, created from the environment on first use.
pub async fn shared_generator() -> Result<&'static Generator, GenerationError> {
    get_or_init(&SHARED, Generator::from_env).await
}

async fn get_or_init<F>(cell: &OnceCell<Generator>, init: F) -> Result<&Generator, GenerationError>
where
    F: FnOnce() -> Result<Generator, GenerationError>,
{
    cell.get_or_try_init(|| async move { init() }).await
}
