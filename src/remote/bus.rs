//! Command bus between the transport and the control loop.
//!
//! Uses `embassy-sync` bounded channels so a transport running on another
//! thread can hand commands to the synchronous control loop without
//! sharing the core.  The control loop is the only consumer of requests
//! and the only producer of replies.
//!
//! ```text
//! ┌──────────────┐   Request   ┌──────────────┐
//! │  Transport   │────────────▶│ Control Loop │
//! │  (console)   │◀────────────│  (ticks)     │
//! └──────────────┘    Reply    └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::{AppCommand, CommandReply};
use crate::error::CommandError;

/// Channel depth for inbound requests.
pub const REQUEST_DEPTH: usize = 8;

/// Channel depth for outbound replies.
pub const REPLY_DEPTH: usize = 16;

/// Inbound request.  Parse failures travel too, so the core can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub id: u32,
    pub command: Result<AppCommand, CommandError>,
}

/// Outcome of one request, tagged with the request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub id: u32,
    pub outcome: Result<CommandReply, CommandError>,
}

pub struct CommandBus {
    requests: Channel<CriticalSectionRawMutex, Request, REQUEST_DEPTH>,
    replies: Channel<CriticalSectionRawMutex, Reply, REPLY_DEPTH>,
    next_id: AtomicU32,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBus {
    pub const fn new() -> Self {
        Self {
            requests: Channel::new(),
            replies: Channel::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Queue a typed command.  Returns the request id, or `Busy` when the
    /// queue is full.
    pub fn submit(&self, command: AppCommand) -> Result<u32, CommandError> {
        self.submit_parsed(Ok(command))
    }

    /// Queue the result of parsing a line, valid or not.
    pub fn submit_parsed(&self, command: Result<AppCommand, CommandError>) -> Result<u32, CommandError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.requests
            .try_send(Request { id, command })
            .map_err(|_| CommandError::Busy)?;
        Ok(id)
    }

    /// Hand every queued request to `handle`, oldest first, and post the
    /// replies.  At most [`REQUEST_DEPTH`] requests are taken per call.
    pub fn drain(
        &self,
        mut handle: impl FnMut(Result<AppCommand, CommandError>) -> Result<CommandReply, CommandError>,
    ) -> usize {
        let mut handled = 0;
        while handled < REQUEST_DEPTH {
            let Ok(req) = self.requests.try_receive() else {
                break;
            };
            let reply = Reply {
                id: req.id,
                outcome: handle(req.command),
            };
            if self.replies.try_send(reply).is_err() {
                warn!("reply queue full, dropping reply to request {}", req.id);
            }
            handled += 1;
        }
        handled
    }

    /// Next reply, if any.
    pub fn take_reply(&self) -> Option<Reply> {
        self.replies.try_receive().ok()
    }

    /// Requests waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}
