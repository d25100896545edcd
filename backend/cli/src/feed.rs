//! Demo UI client: a cursor over a fixed-length feed.
//!
//! Stands in for the cross-platform UI layer on the far side of the command
//! channel. Moving past either end is answered with an application error.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use swipebridge_channels::MethodCallHandler;
use swipebridge_core::{Command, MethodError};
use tracing::debug;

pub const DEFAULT_FEED_LEN: usize = 10;

pub struct FeedClient {
    len: usize,
    cursor: Mutex<usize>,
}

impl FeedClient {
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            cursor: Mutex::new(0),
        }
    }

    pub fn position(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MethodCallHandler for FeedClient {
    async fn on_method_call(&self, command: &Command) -> Result<Value, MethodError> {
        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        match command.name.as_str() {
            "swipeUp" => {
                if *cursor + 1 >= self.len {
                    return Err(MethodError::new(
                        "end_of_feed",
                        format!("already at the last of {} items", self.len),
                    ));
                }
                *cursor += 1;
            }
            "swipeDown" => {
                if *cursor == 0 {
                    return Err(MethodError::new("start_of_feed", "already at the first item"));
                }
                *cursor -= 1;
            }
            other => return Err(MethodError::not_implemented(other)),
        }
        debug!(command = %command.name, index = *cursor, "Feed moved");
        Ok(json!({ "index": *cursor, "total": self.len }))
    }
}
