//! In-memory stand-ins for the OS and automation seams.

use crate::{
    AgentLoader, CommandPoster, CoreResult, HookAgent, HookModule, MediaCommand, MediaTarget,
    MediaTargetConnector, PostOutcome, RelayDestination, RelayError, RelayMessage, RelaySender,
    ShellHook, TargetError, TargetResult, UserNotifier,
};

use std::{cell::RefCell, collections::VecDeque, panic::Location, rc::Rc};

use error_location::ErrorLocation;

#[track_caller]
fn location() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

/// Shell hook that counts installs and can be told to refuse.
#[derive(Default)]
pub(crate) struct FakeShellHook {
    pub(crate) refuse: bool,
    pub(crate) installs: RefCell<u32>,
    pub(crate) uninstalls: RefCell<u32>,
}

impl FakeShellHook {
    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }
}

impl ShellHook for FakeShellHook {
    type Handle = u32;

    fn install(&self) -> CoreResult<u32> {
        if self.refuse {
            return Err(RelayError::HookInstallFailed {
                reason: "access denied".to_string(),
                location: location(),
            });
        }
        let mut installs = self.installs.borrow_mut();
        *installs += 1;
        Ok(*installs)
    }

    fn uninstall(&self, _handle: u32) {
        *self.uninstalls.borrow_mut() += 1;
    }
}

/// Poster that records every post and returns a fixed outcome.
pub(crate) struct RecordingPoster {
    pub(crate) outcome: PostOutcome,
    pub(crate) posts: RefCell<Vec<(RelayDestination, RelayMessage)>>,
}

impl Default for RecordingPoster {
    fn default() -> Self {
        Self {
            outcome: PostOutcome::Queued,
            posts: RefCell::new(Vec::new()),
        }
    }
}

impl CommandPoster for RecordingPoster {
    fn post(&self, destination: RelayDestination, message: RelayMessage) -> PostOutcome {
        self.posts.borrow_mut().push((destination, message));
        self.outcome
    }
}

/// Shared record of target traffic.
#[derive(Default)]
pub(crate) struct TargetLog {
    /// Every operation invoked on any handle, in order.
    pub(crate) calls: Vec<MediaCommand>,
    /// Scripted operation results, front first. Empty means success.
    pub(crate) results: VecDeque<bool>,
    /// Number of connection attempts.
    pub(crate) connects: u32,
    /// Scripted connection results, front first. Empty means success.
    pub(crate) connect_results: VecDeque<bool>,
}

pub(crate) type SharedTargetLog = Rc<RefCell<TargetLog>>;

pub(crate) struct FakeTarget {
    log: SharedTargetLog,
}

impl FakeTarget {
    fn record(&mut self, command: MediaCommand) -> TargetResult<()> {
        let mut log = self.log.borrow_mut();
        log.calls.push(command);
        if log.results.pop_front().unwrap_or(true) {
            Ok(())
        } else {
            Err(TargetError::OperationFailed {
                command,
                reason: "RPC server unavailable".to_string(),
                location: location(),
            })
        }
    }
}

impl MediaTarget for FakeTarget {
    fn play(&mut self) -> TargetResult<()> {
        self.record(MediaCommand::Play)
    }

    fn pause(&mut self) -> TargetResult<()> {
        self.record(MediaCommand::Pause)
    }

    fn stop(&mut self) -> TargetResult<()> {
        self.record(MediaCommand::Stop)
    }

    fn previous_track(&mut self) -> TargetResult<()> {
        self.record(MediaCommand::PreviousTrack)
    }

    fn next_track(&mut self) -> TargetResult<()> {
        self.record(MediaCommand::NextTrack)
    }
}

pub(crate) struct FakeConnector {
    pub(crate) log: SharedTargetLog,
}

impl MediaTargetConnector for FakeConnector {
    type Target = FakeTarget;

    fn target_name(&self) -> &str {
        "Fake.Player"
    }

    fn connect(&mut self) -> TargetResult<FakeTarget> {
        let mut log = self.log.borrow_mut();
        log.connects += 1;
        if log.connect_results.pop_front().unwrap_or(true) {
            Ok(FakeTarget {
                log: Rc::clone(&self.log),
            })
        } else {
            Err(TargetError::ConnectFailed {
                target: "Fake.Player".to_string(),
                reason: "class not registered".to_string(),
                location: location(),
            })
        }
    }
}

/// Shared record of module traffic.
#[derive(Default)]
pub(crate) struct ModuleLog {
    pub(crate) loads: u32,
    pub(crate) fail_load: bool,
    pub(crate) fail_install: bool,
    pub(crate) installs: Vec<RelayDestination>,
    pub(crate) removes: u32,
    pub(crate) releases: u32,
}

pub(crate) type SharedModuleLog = Rc<RefCell<ModuleLog>>;

pub(crate) struct FakeModule {
    log: SharedModuleLog,
}

impl HookModule for FakeModule {
    fn install_hook(&mut self, destination: RelayDestination) -> CoreResult<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_install {
            return Err(RelayError::HookInstallFailed {
                reason: "error 5".to_string(),
                location: location(),
            });
        }
        log.installs.push(destination);
        Ok(())
    }

    fn remove_hook(&mut self) {
        self.log.borrow_mut().removes += 1;
    }

    fn release_destination(&mut self) -> bool {
        self.log.borrow_mut().releases += 1;
        true
    }
}

pub(crate) struct FakeLoader {
    pub(crate) log: SharedModuleLog,
}

impl AgentLoader for FakeLoader {
    type Module = FakeModule;

    fn load(&mut self) -> CoreResult<FakeModule> {
        let mut log = self.log.borrow_mut();
        log.loads += 1;
        if log.fail_load {
            return Err(RelayError::AgentEntryPointMissing {
                symbol: "InstallHook".to_string(),
                location: location(),
            });
        }
        Ok(FakeModule {
            log: Rc::clone(&self.log),
        })
    }
}

/// Notifier that keeps every message.
#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: Rc<RefCell<Vec<String>>>,
}

impl UserNotifier for RecordingNotifier {
    fn notify(&self, _summary: &str, body: &str) {
        self.messages.borrow_mut().push(body.to_string());
    }
}

pub(crate) type SharedAgent<'r> = Rc<RefCell<HookAgent<'r, FakeShellHook, RelaySender>>>;

/// Module backed by a real [`HookAgent`], as the agent DLL would be.
pub(crate) struct AgentModule<'r> {
    agent: SharedAgent<'r>,
}

impl HookModule for AgentModule<'_> {
    fn install_hook(&mut self, destination: RelayDestination) -> CoreResult<()> {
        self.agent.borrow_mut().install(destination)
    }

    fn remove_hook(&mut self) {
        self.agent.borrow_mut().uninstall();
    }

    fn release_destination(&mut self) -> bool {
        self.agent.borrow_mut().release_destination()
    }
}

pub(crate) struct AgentModuleLoader<'r> {
    pub(crate) agent: SharedAgent<'r>,
}

impl<'r> AgentLoader for AgentModuleLoader<'r> {
    type Module = AgentModule<'r>;

    fn load(&mut self) -> CoreResult<AgentModule<'r>> {
        Ok(AgentModule {
            agent: Rc::clone(&self.agent),
        })
    }
}

#[allow(clippy::unwrap_used)]
pub(crate) fn destination(raw: usize) -> RelayDestination {
    RelayDestination::new(raw).unwrap()
}
