//! # Dispatcher
//!
//! The host delivers a function name plus positional string arguments on
//! one of two surfaces. [`Chaincode::invoke`] serves the mutating surface
//! and [`Chaincode::query`] the read-only one. Queries run against a
//! read-only view of the store, so a query can never write.
//!
//! ## Functions
//!
//! | Surface | Function | Arguments |
//! |---------|----------|-----------|
//! | invoke | `init` | any (ignored) |
//! | invoke | `write` | key, value |
//! | invoke | `createUser` | username, password, role |
//! | invoke | `createLC` | LC JSON |
//! | invoke | `uploadDocument` | shipmentId, documentName, content |
//! | invoke | `updateStatus` | shipmentId, field, bool |
//! | query | `read` | key |
//! | query | `login` | username, password (extra ignored) |
//! | query | `fileView` | shipmentId, documentName (extra ignored) |
//! | query | `getAllLCs` | none (extra ignored) |
//! | query | `documentSlots` | shipmentId |

use serde::Serialize;
use tradelc_core::{LedgerError, LedgerResult, StateStore, StoreError, Surface};

use crate::bootstrap::{bootstrap, BootstrapReport};
use crate::config::ContractConfig;
use crate::documents::DocumentLedger;
use crate::registry::LcRegistry;
use crate::users::UserDirectory;

// ─── Function Tables ─────────────────────────────────────────────────

/// Required argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    fn check(self, function: &str, got: usize) -> LedgerResult<()> {
        let expected = match self {
            Self::Exactly(n) if got != n => n.to_string(),
            Self::AtLeast(n) if got < n => format!("at least {n}"),
            _ => return Ok(()),
        };
        Err(LedgerError::Validation(format!(
            "incorrect number of arguments for {function}: expecting {expected}, got {got}"
        )))
    }
}

/// Functions on the mutating surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeFunction {
    Init,
    Write,
    CreateUser,
    CreateLc,
    UploadDocument,
    UpdateStatus,
}

impl InvokeFunction {
    pub const ALL: [InvokeFunction; 6] = [
        Self::Init,
        Self::Write,
        Self::CreateUser,
        Self::CreateLc,
        Self::UploadDocument,
        Self::UpdateStatus,
    ];

    /// Function name as the host sends it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Write => "write",
            Self::CreateUser => "createUser",
            Self::CreateLc => "createLC",
            Self::UploadDocument => "uploadDocument",
            Self::UpdateStatus => "updateStatus",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    fn arity(&self) -> Arity {
        match self {
            Self::Init => Arity::Any,
            Self::Write => Arity::Exactly(2),
            Self::CreateUser | Self::UploadDocument | Self::UpdateStatus => Arity::Exactly(3),
            Self::CreateLc => Arity::Exactly(1),
        }
    }
}

/// Functions on the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFunction {
    Read,
    Login,
    FileView,
    GetAllLcs,
    DocumentSlots,
}

impl QueryFunction {
    pub const ALL: [QueryFunction; 5] = [
        Self::Read,
        Self::Login,
        Self::FileView,
        Self::GetAllLcs,
        Self::DocumentSlots,
    ];

    /// Function name as the host sends it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Login => "login",
            Self::FileView => "fileView",
            Self::GetAllLcs => "getAllLCs",
            Self::DocumentSlots => "documentSlots",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    fn arity(&self) -> Arity {
        match self {
            Self::Read | Self::DocumentSlots => Arity::Exactly(1),
            Self::Login | Self::FileView => Arity::AtLeast(2),
            Self::GetAllLcs => Arity::Any,
        }
    }
}

// ─── Chaincode ───────────────────────────────────────────────────────

/// The contract entry point: a store plus configuration.
#[derive(Debug, Clone)]
pub struct Chaincode<S> {
    store: S,
    config: ContractConfig,
}

impl<S: StateStore> Chaincode<S> {
    pub fn new(store: S, config: ContractConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Run bootstrap. Called by the host when the contract is instantiated.
    pub fn init(&self) -> LedgerResult<BootstrapReport> {
        bootstrap(&self.store, &self.config)
    }

    /// Dispatch a mutating call.
    ///
    /// Every current function returns `None` on success.
    pub fn invoke<A: AsRef<str>>(
        &self,
        function: &str,
        args: &[A],
    ) -> LedgerResult<Option<Vec<u8>>> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        tracing::debug!(surface = %Surface::Invoke, function, args = args.len(), "dispatching");

        let result = self.dispatch_invoke(function, &args);
        if let Err(e) = &result {
            tracing::warn!(surface = %Surface::Invoke, function, code = e.code(), error = %e, "invocation failed");
        }
        result
    }

    /// Dispatch a read-only call.
    pub fn query<A: AsRef<str>>(&self, function: &str, args: &[A]) -> LedgerResult<Vec<u8>> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        tracing::debug!(surface = %Surface::Query, function, args = args.len(), "dispatching");

        let result = self.dispatch_query(function, &args);
        if let Err(e) = &result {
            tracing::warn!(surface = %Surface::Query, function, code = e.code(), error = %e, "query failed");
        }
        result
    }

    fn dispatch_invoke(&self, name: &str, args: &[&str]) -> LedgerResult<Option<Vec<u8>>> {
        let function = InvokeFunction::parse(name).ok_or_else(|| LedgerError::UnknownFunction {
            function: name.to_string(),
            surface: Surface::Invoke,
        })?;
        function.arity().check(name, args.len())?;

        let store = &self.store;
        match function {
            InvokeFunction::Init => {
                self.init()?;
            }
            InvokeFunction::Write => {
                store.put(args[0], args[1].as_bytes())?;
                tracing::info!(key = args[0], bytes = args[1].len(), "raw state written");
            }
            InvokeFunction::CreateUser => {
                UserDirectory::new(store).create_user(args[0], args[1], args[2])?;
            }
            InvokeFunction::CreateLc => {
                LcRegistry::new(store, self.config.status_field_policy).create_lc(args[0])?;
            }
            InvokeFunction::UploadDocument => {
                DocumentLedger::new(store, self.config.docs_uploaded_threshold)
                    .upload(args[0], args[1], args[2])?;
            }
            InvokeFunction::UpdateStatus => {
                LcRegistry::new(store, self.config.status_field_policy)
                    .update_status(args[0], args[1], args[2])?;
            }
        }
        Ok(None)
    }

    fn dispatch_query(&self, name: &str, args: &[&str]) -> LedgerResult<Vec<u8>> {
        let function = QueryFunction::parse(name).ok_or_else(|| LedgerError::UnknownFunction {
            function: name.to_string(),
            surface: Surface::Query,
        })?;
        function.arity().check(name, args.len())?;

        let store = ReadOnly(&self.store);
        let registry = LcRegistry::new(&store, self.config.status_field_policy);
        match function {
            QueryFunction::Read => registry.read(args[0]),
            QueryFunction::Login => {
                let user = UserDirectory::new(&store).login(args[0], args[1])?;
                if self.config.login_returns_secret {
                    encode(&user)
                } else {
                    encode(&user.profile())
                }
            }
            QueryFunction::FileView => {
                DocumentLedger::new(&store, self.config.docs_uploaded_threshold)
                    .view(args[0], args[1])
            }
            QueryFunction::GetAllLcs => encode(&registry.all()?),
            QueryFunction::DocumentSlots => encode(&registry.load(args[0])?.document_slots()),
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| LedgerError::Write(format!("error marshalling result: {e}")))
}

/// Store view for the query surface: reads pass through, writes fail,
/// events are dropped.
struct ReadOnly<'a, S>(&'a S);

impl<S: StateStore> StateStore for ReadOnly<'_, S> {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.0.get(key)
    }

    fn put(&self, key: &str, _value: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Write {
            key: key.to_string(),
            reason: "query surface is read-only".to_string(),
        })
    }

    fn emit_event(&self, name: &str, _payload: &[u8]) {
        tracing::warn!(event = name, "event dropped on query surface");
    }

    fn tx_id(&self) -> String {
        self.0.tx_id()
    }
}
