//! libcurl-backed HTTP transport.

use super::{HttpTransport, TransferError};
use crate::progress::DownloadProgress;
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::time::Duration;

/// Whole-file GET through a libcurl easy handle, with progress from libcurl's
/// transfer-info callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for CurlTransport {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(DownloadProgress),
    ) -> Result<u64, TransferError> {
        let written = Cell::new(0u64);
        let write_error: RefCell<Option<io::Error>> = RefCell::new(None);

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        easy.progress(true)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written.set(written.get() + data.len() as u64);
                    Ok(data.len())
                }
                Err(e) => {
                    write_error.borrow_mut().replace(e);
                    // short count aborts the transfer
                    Ok(0)
                }
            })?;
            transfer.progress_function(|dltotal, dlnow, _ultotal, _ulnow| {
                on_progress(DownloadProgress::new(dlnow as u64, dltotal as u64));
                true
            })?;
            if let Err(e) = transfer.perform() {
                if e.is_write_error() {
                    if let Some(io_err) = write_error.borrow_mut().take() {
                        return Err(TransferError::Io(io_err));
                    }
                }
                return Err(TransferError::Curl(e));
            }
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Status(code));
        }

        Ok(written.get())
    }
}
