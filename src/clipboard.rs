use std::future::Future;
use std::pin::Pin;

/// A boxed, single-threaded future. Browser promises are `!Send`.
pub type LocalTask<T> = Pin<Box<dyn Future<Output = T>>>;

/// Platform clipboard capability.
pub trait Clipboard {
    /// Starts writing `text`; the future settles when the platform answers.
    fn write_text(&self, text: &str) -> LocalTask<anyhow::Result<()>>;
}

impl<C: Clipboard + ?Sized> Clipboard for &C {
    fn write_text(&self, text: &str) -> LocalTask<anyhow::Result<()>> {
        (**self).write_text(text)
    }
}

/// Best-effort copy of `text` to the clipboard.
///
/// Without a clipboard this does nothing. Otherwise the write is handed to
/// `spawn` and the call returns at once; a failed write is dropped.
pub fn copy_to_clipboard<C, F>(clipboard: Option<&C>, text: &str, spawn: F)
where
    C: Clipboard + ?Sized,
    F: FnOnce(LocalTask<()>),
{
    let Some(clipboard) = clipboard else {
        tracing::debug!("clipboard unavailable; copy skipped");
        return;
    };

    let write = clipboard.write_text(text);
    spawn(Box::pin(async move {
        if let Err(e) = write.await {
            tracing::debug!(error = %e, "clipboard write failed");
        }
    }));
}
