//! Chunked streaming HTTP transport (fallback when libcurl is not built in).

use super::{HttpTransport, TransferError};
use crate::progress::DownloadProgress;
use std::io::{Read, Write};

/// Bytes read from the response per chunk.
pub const CHUNK_SIZE: usize = 1024;

/// Blocking reqwest client reading the body in fixed-size chunks.
#[derive(Debug, Clone)]
pub struct StreamTransport {
    client: reqwest::blocking::Client,
}

impl StreamTransport {
    pub fn new() -> Result<Self, TransferError> {
        let client = reqwest::blocking::Client::builder()
            // whole-file transfers can take hours
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for StreamTransport {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(DownloadProgress),
    ) -> Result<u64, TransferError> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(u32::from(status.as_u16())));
        }

        let total = match response.content_length() {
            Some(len) => len,
            None => {
                // no declared length: write the body in one go, no progress
                let written = response.copy_to(sink)?;
                return Ok(written);
            }
        };

        let mut buf = [0u8; CHUNK_SIZE];
        let mut downloaded = 0u64;
        loop {
            let n = response.read(&mut buf)?;
            if n == 0 {
                break;
            }
            sink.write_all(&buf[..n])?;
            downloaded += n as u64;
            on_progress(DownloadProgress::new(downloaded, total));
        }
        Ok(downloaded)
    }
}
