use crate::{MediaCommand, TargetResult};

/// The automation-controlled media player.
///
/// Each operation reports failure rather than panicking; a failure usually
/// means the player process exited and the handle is stale.
pub trait MediaTarget {
    /// Start playback.
    fn play(&mut self) -> TargetResult<()>;

    /// Pause playback.
    fn pause(&mut self) -> TargetResult<()>;

    /// Stop playback.
    fn stop(&mut self) -> TargetResult<()>;

    /// Skip to the previous track.
    fn previous_track(&mut self) -> TargetResult<()>;

    /// Skip to the next track.
    fn next_track(&mut self) -> TargetResult<()>;

    /// Invoke the operation matching `command`.
    fn execute(&mut self, command: MediaCommand) -> TargetResult<()> {
        match command {
            MediaCommand::Play => self.play(),
            MediaCommand::Pause => self.pause(),
            MediaCommand::Stop => self.stop(),
            MediaCommand::PreviousTrack => self.previous_track(),
            MediaCommand::NextTrack => self.next_track(),
        }
    }
}

/// Acquires handles to the media target.
pub trait MediaTargetConnector {
    /// Handle type produced by a successful connection.
    type Target: MediaTarget;

    /// Registered identity of the target, for messages.
    fn target_name(&self) -> &str;

    /// Attempt to connect. May be called repeatedly.
    fn connect(&mut self) -> TargetResult<Self::Target>;
}
