//! Stand-ins for the agent module, media target and desktop notifier.

use remote_tunes_core::{
    AgentLoader, CoreResult, HookModule, MediaCommand, MediaTarget, MediaTargetConnector,
    RelayDestination, RelayError, TargetResult, UserNotifier,
};

use std::{cell::RefCell, panic::Location, rc::Rc};

use error_location::ErrorLocation;

/// Everything the controller did to its collaborators.
#[derive(Default)]
pub(crate) struct Activity {
    pub(crate) fail_load: bool,
    pub(crate) loads: u32,
    pub(crate) installs: Vec<RelayDestination>,
    pub(crate) removes: u32,
    pub(crate) releases: u32,
    pub(crate) connects: u32,
    pub(crate) delivered: Vec<MediaCommand>,
}

pub(crate) type SharedActivity = Rc<RefCell<Activity>>;

pub(crate) struct FakeModule {
    activity: SharedActivity,
}

impl HookModule for FakeModule {
    fn install_hook(&mut self, destination: RelayDestination) -> CoreResult<()> {
        self.activity.borrow_mut().installs.push(destination);
        Ok(())
    }

    fn remove_hook(&mut self) {
        self.activity.borrow_mut().removes += 1;
    }

    fn release_destination(&mut self) -> bool {
        self.activity.borrow_mut().releases += 1;
        true
    }
}

pub(crate) struct FakeLoader {
    pub(crate) activity: SharedActivity,
}

impl AgentLoader for FakeLoader {
    type Module = FakeModule;

    fn load(&mut self) -> CoreResult<FakeModule> {
        let mut activity = self.activity.borrow_mut();
        activity.loads += 1;
        if activity.fail_load {
            return Err(RelayError::AgentLoadFailed {
                module: "remote_tunes_hook.dll".to_string(),
                reason: "The specified module could not be found.".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(FakeModule {
            activity: Rc::clone(&self.activity),
        })
    }
}

pub(crate) struct FakeTarget {
    activity: SharedActivity,
}

impl FakeTarget {
    fn deliver(&mut self, command: MediaCommand) -> TargetResult<()> {
        self.activity.borrow_mut().delivered.push(command);
        Ok(())
    }
}

impl MediaTarget for FakeTarget {
    fn play(&mut self) -> TargetResult<()> {
        self.deliver(MediaCommand::Play)
    }

    fn pause(&mut self) -> TargetResult<()> {
        self.deliver(MediaCommand::Pause)
    }

    fn stop(&mut self) -> TargetResult<()> {
        self.deliver(MediaCommand::Stop)
    }

    fn previous_track(&mut self) -> TargetResult<()> {
        self.deliver(MediaCommand::PreviousTrack)
    }

    fn next_track(&mut self) -> TargetResult<()> {
        self.deliver(MediaCommand::NextTrack)
    }
}

pub(crate) struct FakeConnector {
    pub(crate) activity: SharedActivity,
}

impl MediaTargetConnector for FakeConnector {
    type Target = FakeTarget;

    fn target_name(&self) -> &str {
        "Fake.Player"
    }

    fn connect(&mut self) -> TargetResult<FakeTarget> {
        self.activity.borrow_mut().connects += 1;
        Ok(FakeTarget {
            activity: Rc::clone(&self.activity),
        })
    }
}

/// Notifier that keeps `(summary, body)` pairs.
#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: Rc<RefCell<Vec<(String, String)>>>,
}

impl UserNotifier for RecordingNotifier {
    fn notify(&self, summary: &str, body: &str) {
        self.messages
            .borrow_mut()
            .push((summary.to_string(), body.to_string()));
    }
}
