//! Observable events
//!
//! Every log line names one of these events. Events are explicit and typed.

use std::fmt;

/// Observable events in the DAS server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Server startup begins
    ServerStart,
    /// Listener bound, ready to serve
    Serving,
    /// Shutdown initiated
    ShutdownStart,
    /// Configuration loaded
    ConfigLoaded,

    // Health
    HealthCheck,

    // Registration
    /// Register call received
    RegisterReceived,
    /// New instance created and stored
    DasRegistered,
    /// Register named an id that is already active
    DasReused,
    /// Register rejected in-band
    DasRegisterRejected,
    /// Instance removed and closed
    DasUnregistered,
    /// Instance built with options
    InstanceCreated,
    /// Instance released its resources
    InstanceClosed,

    // Lookup failures
    DasNotFound,
    TableNotFound,

    // Table calls
    /// Any table-scoped call received
    TableCall,
    /// Execute stream started
    ExecuteBegin,
    /// Facade observed cancellation and closed the stream
    StreamCancelled,
    /// Stream finalized
    StreamClosed,
    /// Mutation call returned unsupported
    MutationUnsupported,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServerStart => "DAS_SERVER_STARTUP_BEGIN",
            Event::Serving => "DAS_SERVER_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::HealthCheck => "HEALTH_CHECK",

            Event::RegisterReceived => "REGISTER_BEGIN",
            Event::DasRegistered => "DAS_REGISTERED",
            Event::DasReused => "DAS_ALREADY_REGISTERED",
            Event::DasRegisterRejected => "DAS_REGISTER_REJECTED",
            Event::DasUnregistered => "DAS_UNREGISTERED",
            Event::InstanceCreated => "DAS_INSTANCE_CREATED",
            Event::InstanceClosed => "DAS_INSTANCE_CLOSED",

            Event::DasNotFound => "DAS_NOT_FOUND",
            Event::TableNotFound => "TABLE_NOT_FOUND",

            Event::TableCall => "TABLE_CALL",
            Event::ExecuteBegin => "EXECUTE_TABLE_BEGIN",
            Event::StreamCancelled => "EXECUTE_TABLE_CANCELLED",
            Event::StreamClosed => "TABLE_STREAM_CLOSED",
            Event::MutationUnsupported => "MUTATION_UNSUPPORTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
