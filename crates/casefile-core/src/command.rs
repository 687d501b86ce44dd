//! Player intents.

use uuid::Uuid;

/// Something the player asked the game to do: start a mission, pick an
/// option. The correlation id is copied onto every event the request
/// produces so a log search can follow one click end to end.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Short name logged as the `command` field.
    fn command_type(&self) -> &'static str;

    /// Id shared by this request and the events it causes.
    fn correlation_id(&self) -> Uuid;
}
