use std::{any::Any, io, io::Read, panic, thread};

use crossbeam::channel::{self, Receiver};
use tracing::debug;

use super::{error::ScanError, scanner::Scanner, token::Token};

/// Tokens handed over from a scanner running on its own thread.
///
/// The channel between the two sides has no capacity: the scanner blocks
/// after recognizing a token until the consumer takes it. Dropping the
/// stream (or calling [`TokenStream::finish`]) disconnects the channel,
/// which wakes a parked scanner so its thread can exit.
///
/// A scanner blocked inside `read` (stdin, a socket) only notices the
/// disconnect once that read returns. Dropping a stream before its
/// terminal token therefore detaches the thread instead of waiting for
/// it; `finish` always waits.
pub struct TokenStream {
    receiver: Option<Receiver<Token>>,
    worker: Option<thread::JoinHandle<Option<ScanError>>>,
    done: bool,
}

impl TokenStream {
    pub fn spawn<R: Read + Send + 'static>(reader: R) -> io::Result<Self> {
        let (sender, receiver) = channel::bounded(0);
        let worker = thread::Builder::new()
            .name("bqlex-scanner".to_string())
            .spawn(move || {
                let mut scanner = Scanner::new(reader);
                while let Some(token) = scanner.next_token() {
                    if sender.send(token).is_err() {
                        debug!("consumer closed the token stream");
                        return None;
                    }
                }
                scanner.into_error()
            })?;
        Ok(TokenStream {
            receiver: Some(receiver),
            worker: Some(worker),
            done: false,
        })
    }

    /// Blocks until the scanner produces the next token. Returns `None`
    /// once the terminal token has been delivered.
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.receiver.as_ref()?.recv().ok();
        self.done = token.as_ref().map_or(true, |t| t.kind.is_terminal());
        token
    }

    /// Closes the stream and waits for the scanner thread. Returns the
    /// scan error if the scanner ran to an ILLEGAL token.
    pub fn finish(mut self) -> Option<ScanError> {
        self.receiver.take();
        match self.worker.take()?.join() {
            Ok(err) => err,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl Drop for TokenStream {
    fn drop(&mut self) {
        // Disconnect first so a blocked send returns.
        self.receiver.take();
        let Some(worker) = self.worker.take() else {
            return;
        };
        if !self.done {
            debug!("token stream dropped early, detaching scanner thread");
            return;
        }
        if let Err(payload) = worker.join() {
            debug!(panic = panic_message(&*payload), "scanner thread panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
