//! WebSocket layer: live detail views with a countdown.
//!
//! The endpoint at `/ws` accepts `watch` and `unwatch` commands. A watched
//! view is fetched once, pushed as a `view` event, and then followed by
//! `countdown` events until the client moves on or disconnects.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod session;
