//! Serial console task
//!
//! Reads command lines from UART0, answers `help` directly and forwards
//! `get`/`set` to the job task. Every command gets exactly one response
//! line (help prints its text instead).

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use thermochron_protocol::{
    Command, HelpText, LineBuffer, LineError, Response, ResponseError,
};

use crate::channels::{JOB_REQUEST, JOB_RESPONSE};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Console task - line editing, parsing and replies
#[embassy_executor::task]
pub async fn console_task(mut rx: BufferedUartRx, mut tx: BufferedUartTx) {
    info!("Console task started");

    let mut lines: LineBuffer = LineBuffer::new();
    let mut help = HelpText::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                lines.reset();
                continue;
            }
        };

        for &byte in &buf[..n] {
            match lines.feed(byte) {
                Ok(Some(line)) => handle_line(&line, &mut help, &mut tx).await,
                Ok(None) => {}
                Err(e) => {
                    warn!("Discarded console line: {:?}", e);
                    let reason = match e {
                        LineError::Overflow => ResponseError::LineTooLong,
                        LineError::InvalidUtf8 => ResponseError::InvalidEncoding,
                    };
                    write_response(&mut tx, &Response::Err(reason)).await;
                }
            }
        }
    }
}

/// Parse and execute one command line
async fn handle_line(line: &str, help: &mut HelpText, tx: &mut BufferedUartTx) {
    match Command::parse(line) {
        Ok(Command::Help) => {
            for text in help.lines() {
                write_line(tx, text).await;
            }
        }
        Ok(command) => {
            JOB_REQUEST.send(command).await;
            let response = JOB_RESPONSE.receive().await;
            write_response(tx, &response).await;
        }
        Err(e) => {
            debug!("Rejected command: {:?}", e);
            write_response(tx, &Response::from(e)).await;
        }
    }
}

async fn write_response(tx: &mut BufferedUartTx, response: &Response) {
    write_line(tx, &response.to_line()).await;
}

async fn write_line(tx: &mut BufferedUartTx, text: &str) {
    let result = match tx.write_all(text.as_bytes()).await {
        Ok(()) => tx.write_all(b"\r\n").await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!("UART write error: {:?}", e);
    }
}
