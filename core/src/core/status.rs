use std::{
    fmt::Display,
    time::{Duration, Instant},
};

/// Reason reported by the transport when the link to the front is lost.
/// The transport reconnects on its own, these are informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    Closed,
    NetworkReadFailed,
    NetworkWriteFailed,
    SubscriptionReadFailed,
    BadSequence,
    HeartbeatReadFailed,
    BadPacketSize,
    Unknown(i32),
}
impl From<i32> for DisconnectReason {
    fn from(code: i32) -> Self {
        use DisconnectReason::*;
        match code {
            -3 => Closed,
            -4 => NetworkReadFailed,
            -5 => NetworkWriteFailed,
            -6 => SubscriptionReadFailed,
            -7 => BadSequence,
            -8 => HeartbeatReadFailed,
            -9 => BadPacketSize,
            other => Unknown(other),
        }
    }
}
impl From<DisconnectReason> for i32 {
    fn from(reason: DisconnectReason) -> Self {
        use DisconnectReason::*;
        match reason {
            Closed => -3,
            NetworkReadFailed => -4,
            NetworkWriteFailed => -5,
            SubscriptionReadFailed => -6,
            BadSequence => -7,
            HeartbeatReadFailed => -8,
            BadPacketSize => -9,
            Unknown(code) => code,
        }
    }
}
impl Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use DisconnectReason::*;
        let text = match self {
            Closed => "connection closed",
            NetworkReadFailed => "network read failed",
            NetworkWriteFailed => "network write failed",
            SubscriptionReadFailed => "subscription stream read failed",
            BadSequence => "sequence number error",
            HeartbeatReadFailed => "heartbeat read failed",
            BadPacketSize => "bad network packet size",
            Unknown(_) => "unknown",
        };
        write!(f, "{}({})", text, i32::from(*self))
    }
}

/// Vendor defined replay policy applied to a topic after (re)connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeType {
    /// replay the topic from the start of the trading day
    Restart,
    /// replay from where the previous session stopped
    Resume,
    /// only messages published after login
    Quick,
}

/// Trait for anything that tracks a logical connection to the front
pub trait ConnectionStatus {
    /// logical check of connection status
    fn is_connected(&self) -> bool;
    fn is_connected_busywait_timeout(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.is_connected() {
                return true;
            }
            std::hint::spin_loop();
        }
        // can't assume false at this point and need to recheck in case timeout arg is Duration::ZERO
        self.is_connected()
    }
}
