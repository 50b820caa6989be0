use crate::config::{ClientConfig, DEFAULT_FRAME_QUEUE};
use crate::dispatch::{data_handler, Dispatch};
use crate::library::VendorClient;
use crate::marshal;
use crate::native::NativeClient;
use crate::stream::FrameStream;
use crate::types::{
    ConnectionType, DataDescription, Frame, ServerDescription, Status, Verbosity, Version,
};
use crate::{NatNetError, Result};
use std::ffi::{c_int, CString};
use std::sync::Arc;

/// Longest address the SDK accepts; its address buffers are 128 bytes.
pub const MAX_ADDRESS_LEN: usize = 127;

/// Optional port overrides for [`Endpoints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ports {
    /// SDK default command and data ports.
    Default,
    Command(u16),
    CommandAndData(u16, u16),
}

/// Connection parameters for [`Client::initialize`].
///
/// Carries two, three or four positional parameters, each selecting the
/// matching native `Initialize` overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub local_address: String,
    pub server_address: String,
    pub ports: Ports,
}

impl Endpoints {
    pub fn new(local_address: impl Into<String>, server_address: impl Into<String>) -> Self {
        Endpoints {
            local_address: local_address.into(),
            server_address: server_address.into(),
            ports: Ports::Default,
        }
    }

    pub fn with_command_port(mut self, command_port: u16) -> Self {
        self.ports = Ports::Command(command_port);
        self
    }

    pub fn with_ports(mut self, command_port: u16, data_port: u16) -> Self {
        self.ports = Ports::CommandAndData(command_port, data_port);
        self
    }

    /// Build from positional arguments:
    /// `local server [command_port [data_port]]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [local, server] => Ok(Endpoints::new(local.as_ref(), server.as_ref())),
            [local, server, command] => Ok(Endpoints::new(local.as_ref(), server.as_ref())
                .with_command_port(parse_port("command_port", command.as_ref())?)),
            [local, server, command, data] => Ok(Endpoints::new(local.as_ref(), server.as_ref())
                .with_ports(
                    parse_port("command_port", command.as_ref())?,
                    parse_port("data_port", data.as_ref())?,
                )),
            _ => Err(NatNetError::ArgumentCount(args.len())),
        }
    }

    /// Number of positional parameters these endpoints represent.
    pub fn arity(&self) -> usize {
        match self.ports {
            Ports::Default => 2,
            Ports::Command(_) => 3,
            Ports::CommandAndData(..) => 4,
        }
    }
}

fn parse_port(name: &'static str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| NatNetError::invalid(name, format!("'{}': {}", value, e)))
}

/// Copy an address into a C string, truncated to [`MAX_ADDRESS_LEN`] bytes.
fn address(name: &'static str, value: &str) -> Result<CString> {
    let mut bytes = value.as_bytes();
    if bytes.len() > MAX_ADDRESS_LEN {
        log::warn!(
            "{} longer than {} bytes, truncating: {}",
            name,
            MAX_ADDRESS_LEN,
            value
        );
        bytes = &bytes[..MAX_ADDRESS_LEN];
    }
    CString::new(bytes).map_err(|_| NatNetError::invalid(name, "contains a NUL byte"))
}

/// A NatNet session: one native client plus its registered data callback.
pub struct Client<C: NativeClient = VendorClient> {
    // Dropped first so the SDK's delivery thread is gone before the slot.
    native: C,
    dispatch: Arc<Dispatch>,
    frame_queue: usize,
}

impl Client<VendorClient> {
    /// Load the vendor library named by the environment and create a client.
    pub fn new(connection: ConnectionType) -> Result<Self> {
        Self::with_config(connection, &ClientConfig::from_env())
    }

    pub fn with_config(connection: ConnectionType, config: &ClientConfig) -> Result<Self> {
        Ok(Client::configured(
            VendorClient::open(connection, config)?,
            config,
        ))
    }
}

impl<C: NativeClient> Client<C> {
    pub fn with_native(native: C) -> Self {
        Client {
            native,
            dispatch: Arc::new(Dispatch::new()),
            frame_queue: DEFAULT_FRAME_QUEUE,
        }
    }

    /// Wrap `native`, applying the configured verbosity and frame queue size.
    pub fn configured(native: C, config: &ClientConfig) -> Self {
        let mut client = Client::with_native(native);
        client.frame_queue = config.frame_queue.max(1);
        if let Some(level) = config.verbosity {
            client.set_verbosity_level(level);
        }
        client
    }

    /// The underlying native client.
    pub fn native(&self) -> &C {
        &self.native
    }

    /// Open the network session. Blocks for the handshake.
    ///
    /// Only argument problems are errors; the SDK's verdict is the returned
    /// [`Status`], whatever its value.
    pub fn initialize(&self, endpoints: &Endpoints) -> Result<Status> {
        let local = address("local_address", &endpoints.local_address)?;
        let server = address("server_address", &endpoints.server_address)?;

        let ret = match endpoints.ports {
            Ports::Default => self.native.initialize(&local, &server),
            Ports::Command(command) => {
                self.native
                    .initialize_with_command_port(&local, &server, command as c_int)
            }
            Ports::CommandAndData(command, data) => self.native.initialize_with_ports(
                &local,
                &server,
                command as c_int,
                data as c_int,
            ),
        };

        let status = Status(ret);
        if status.is_success() {
            log::info!(
                "NatNet session initialized: local={} server={} ports={:?}",
                endpoints.local_address,
                endpoints.server_address,
                endpoints.ports
            );
        } else {
            log::warn!(
                "NatNet initialize failed ({}): local={} server={}",
                status,
                endpoints.local_address,
                endpoints.server_address
            );
        }
        Ok(status)
    }

    /// Close the network session.
    pub fn uninitialize(&self) -> Status {
        let status = Status(self.native.uninitialize());
        log::info!("NatNet session uninitialized ({})", status);
        status
    }

    /// Protocol version negotiated with the server.
    pub fn natnet_version(&self) -> Version {
        Version::from(self.native.natnet_version())
    }

    pub fn set_verbosity_level(&self, level: Verbosity) {
        self.set_verbosity_level_raw(level as c_int);
    }

    /// Forward a raw vendor verbosity value.
    pub fn set_verbosity_level_raw(&self, level: c_int) {
        self.native.set_verbosity_level(level);
    }

    /// Fetch the rigid body and marker set descriptions the server publishes.
    /// Skeleton descriptions are not supported and are left out.
    pub fn data_descriptions(&self) -> Vec<DataDescription> {
        let list = self.native.data_descriptions();
        if list.is_null() {
            log::warn!("No data descriptions received from server");
            return Vec::new();
        }
        unsafe {
            let descriptions = marshal::descriptions(&*list);
            self.native.free_data_descriptions(list);
            descriptions
        }
    }

    /// Not implemented by this binding; always `None`.
    pub fn server_description(&self) -> Option<ServerDescription> {
        log::debug!("server_description is not implemented");
        None
    }

    /// Not implemented by this binding; the callback is dropped.
    pub fn set_message_callback<F>(&self, _callback: F)
    where
        F: Fn(Verbosity, &str) + Send + Sync + 'static,
    {
        log::debug!("set_message_callback is not implemented");
    }

    /// Register the per-frame callback, replacing any earlier one.
    ///
    /// `callback` runs on the SDK's delivery thread, once per frame.
    pub fn set_data_callback<F>(&self, callback: F)
    where
        F: Fn(Frame) + Send + Sync + 'static,
    {
        if self.dispatch.replace(Arc::new(callback)) {
            log::debug!("Replaced data callback");
        }
        unsafe {
            self.native
                .set_data_callback(data_handler, self.dispatch.as_user_ptr());
        }
    }

    /// Register a callback that queues frames into a bounded channel sized
    /// by the configured frame queue (`NATNET_FRAME_QUEUE`).
    pub fn frame_stream(&self) -> FrameStream {
        self.frame_stream_with_capacity(self.frame_queue)
    }

    /// Like [`frame_stream`](Self::frame_stream), with an explicit capacity.
    pub fn frame_stream_with_capacity(&self, capacity: usize) -> FrameStream {
        let (sender, stream) = FrameStream::channel(capacity);
        self.set_data_callback(move |frame| sender.forward(frame));
        stream
    }
}
