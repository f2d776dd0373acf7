//! The kind → handler dispatch table, built once at startup and read-only
//! thereafter.

use std::collections::HashMap;

use crate::{
  Error, Result,
  client::ClientKind,
  handler::ClientHandler,
  store::{CompanyStore, PersonStore},
};

#[derive(Debug)]
pub struct HandlerRegistry<PS, CS> {
  handlers: HashMap<ClientKind, ClientHandler<PS, CS>>,
}

impl<PS: PersonStore, CS: CompanyStore> HandlerRegistry<PS, CS> {
  /// Build the dispatch table from the full set of handlers.
  ///
  /// Two handlers claiming the same kind is a wiring bug; construction
  /// fails instead of silently letting the last writer win.
  pub fn new(handlers: Vec<ClientHandler<PS, CS>>) -> Result<Self> {
    let mut map = HashMap::with_capacity(handlers.len());
    for handler in handlers {
      let kind = handler.supported_kind();
      if map.insert(kind, handler).is_some() {
        return Err(Error::DuplicateHandler(kind));
      }
    }
    Ok(Self { handlers: map })
  }

  /// Look up the handler for `kind`, failing with the set of kinds that
  /// are actually registered.
  pub fn resolve(&self, kind: ClientKind) -> Result<&ClientHandler<PS, CS>> {
    self.handlers.get(&kind).ok_or_else(|| Error::UnsupportedClientKind {
      requested:  kind,
      registered: self.registered_kinds(),
    })
  }

  /// The kinds with a registered handler, in a stable order.
  pub fn registered_kinds(&self) -> Vec<ClientKind> {
    let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
    kinds.sort();
    kinds
  }
}
