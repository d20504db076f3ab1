//! Startup-time registry of plugin modules.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tq_core::{Environment, Item};
use tracing::{debug, warn};

use super::{
    Action, Attributes, Category, Combat, Manifest, PluginError, PluginKey, PluginResult,
    SharedHandler, SharedObjectiveHandler,
};

/// A loaded plugin module: catalog attributes plus bound handlers.
#[derive(Debug, Clone)]
pub struct PluginModule {
    /// The module's key.
    pub key: PluginKey,
    /// What the module defines.
    pub category: Category,
    /// Catalog entries.
    pub attributes: Vec<Attributes>,
    handlers: HashMap<Action, SharedHandler>,
    objective: Option<SharedObjectiveHandler>,
}

impl PluginModule {
    /// An empty module.
    pub fn new(key: PluginKey, category: Category) -> Self {
        Self {
            key,
            category,
            attributes: Vec::new(),
            handlers: HashMap::new(),
            objective: None,
        }
    }

    /// Add a catalog entry.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.push(attributes);
        self
    }

    /// Bind a handler to an action.
    pub fn with_handler(mut self, action: Action, handler: SharedHandler) -> Self {
        self.handlers.insert(action, handler);
        self
    }

    /// Bind the completion predicate.
    pub fn with_objective(mut self, handler: SharedObjectiveHandler) -> Self {
        self.objective = Some(handler);
        self
    }

    /// The handler for `action`, if the module exports one.
    pub fn handler(&self, action: Action) -> Option<&SharedHandler> {
        self.handlers.get(&action)
    }

    /// Catalog attributes for a type.
    pub fn attributes_for(&self, kind: &str) -> Option<&Attributes> {
        self.attributes.iter().find(|a| a.kind == kind)
    }
}

/// All plugin modules known to a session, keyed by `(module, filename)`.
///
/// The system default module is always present and handles `fight` and
/// `fight for` with the built-in combat behavior.
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    modules: HashMap<PluginKey, PluginModule>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// A registry holding only the system default module.
    pub fn new() -> Self {
        let combat: SharedHandler = Arc::new(Combat);
        let default_module = PluginModule::new(PluginKey::system_default(), Category::Character)
            .with_handler(Action::Fight, Arc::clone(&combat))
            .with_handler(Action::FightFor, combat);

        let mut modules = HashMap::new();
        modules.insert(default_module.key.clone(), default_module);
        Self { modules }
    }

    /// Build a registry from a manifest.
    pub fn from_manifest(manifest: &Manifest) -> PluginResult<Self> {
        let mut registry = Self::new();
        for spec in &manifest.modules {
            let key = spec.key();
            let mut module = PluginModule::new(key.clone(), spec.category);
            module.attributes = spec.attributes.clone();

            for (name, binding) in &spec.handlers {
                let action: Action = name.parse()?;
                module = module.with_handler(action, binding.handler(&key)?);
            }
            if let Some(binding) = &spec.objective {
                module = module.with_objective(binding.objective_handler(&key)?);
            }

            registry.register(module)?;
        }
        debug!(modules = registry.len(), "plugin registry built");
        Ok(registry)
    }

    /// Read a manifest file and build a registry from it.
    pub fn load(path: &Path) -> PluginResult<Self> {
        Self::from_manifest(&Manifest::load(path)?)
    }

    /// Add a module. Keys must be unique.
    pub fn register(&mut self, module: PluginModule) -> PluginResult<()> {
        if self.modules.contains_key(&module.key) {
            return Err(PluginError::DuplicateModule(module.key));
        }
        self.modules.insert(module.key.clone(), module);
        Ok(())
    }

    /// Number of registered modules, including the system default.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Always false: the system default module is always registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Look up a module.
    pub fn module(&self, key: &PluginKey) -> Option<&PluginModule> {
        self.modules.get(key)
    }

    /// Find the handler for `action` on the module `key`.
    ///
    /// When the module is not registered or exports no such handler, and
    /// `allow_default_fallback` is set, the system default module's handler
    /// for the same action is used instead.
    pub fn resolve_handler(
        &self,
        key: &PluginKey,
        action: Action,
        allow_default_fallback: bool,
    ) -> Option<SharedHandler> {
        match self.modules.get(key) {
            Some(module) => {
                if let Some(handler) = module.handler(action) {
                    return Some(Arc::clone(handler));
                }
                debug!(module = %key, %action, "module exports no handler");
            }
            None => warn!(module = %key, "plugin module is not registered"),
        }

        if !allow_default_fallback {
            return None;
        }
        debug!(module = %key, %action, "falling back to the system default module");
        self.modules
            .get(&PluginKey::system_default())
            .and_then(|m| m.handler(action))
            .map(Arc::clone)
    }

    /// Find the completion predicate of an objective module. Never falls back.
    pub fn resolve_objective(&self, key: &PluginKey) -> Option<SharedObjectiveHandler> {
        let handler = self.modules.get(key)?.objective.as_ref()?;
        Some(Arc::clone(handler))
    }

    /// Catalog attributes for `kind` in the module `key`.
    pub fn attributes(&self, key: &PluginKey, kind: &str) -> Option<&Attributes> {
        self.modules.get(key)?.attributes_for(kind)
    }

    /// Display name of an item: instance override, then catalog, then type.
    pub fn item_name(&self, item: &Item) -> String {
        if let Some(name) = &item.name {
            return name.clone();
        }
        self.attributes(&PluginKey::of_item(item), &item.kind)
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| item.kind.clone())
    }

    /// Damage an item deals: instance override, then catalog.
    pub fn item_damage(&self, item: &Item) -> Option<u32> {
        item.damage.or_else(|| {
            self.attributes(&PluginKey::of_item(item), &item.kind)
                .and_then(|a| a.damage)
        })
    }

    /// Catalog description of an environment.
    pub fn environment_description(&self, environment: &Environment) -> Option<&str> {
        let key = PluginKey::new(&environment.module, &environment.filename);
        self.attributes(&key, &environment.kind)?
            .description
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{BehaviorName, BehaviorSpec, ModuleSpec};

    fn giant_key() -> PluginKey {
        PluginKey::new("creatures", "giant")
    }

    fn manifest() -> Manifest {
        Manifest::default()
            .with_module(
                ModuleSpec::new("creatures", "giant", Category::Character)
                    .with_attributes(Attributes::new("Giant"))
                    .with_handler("give", BehaviorSpec::new(BehaviorName::Accept)),
            )
            .with_module(
                ModuleSpec::new("arms", "blades", Category::Item)
                    .with_attributes(Attributes::new("short sword").with_damage(5)),
            )
            .with_module(
                ModuleSpec::new("quests", "items", Category::Objective)
                    .with_objective(BehaviorSpec::new(BehaviorName::AcquireItem)),
            )
    }

    #[test]
    fn default_module_is_always_present() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .resolve_handler(&PluginKey::system_default(), Action::Fight, false)
                .is_some()
        );
    }

    #[test]
    fn module_handler_wins() {
        let registry = PluginRegistry::from_manifest(&manifest()).unwrap();
        assert!(registry.resolve_handler(&giant_key(), Action::Give, false).is_some());
    }

    #[test]
    fn missing_handler_without_fallback_is_absent() {
        let registry = PluginRegistry::from_manifest(&manifest()).unwrap();
        assert!(registry.resolve_handler(&giant_key(), Action::TakeFrom, false).is_none());
        assert!(registry.resolve_handler(&giant_key(), Action::BuyFrom, false).is_none());
    }

    #[test]
    fn fight_falls_back_to_default() {
        let registry = PluginRegistry::from_manifest(&manifest()).unwrap();
        assert!(registry.resolve_handler(&giant_key(), Action::Fight, true).is_some());
        assert!(registry.resolve_handler(&giant_key(), Action::Fight, false).is_none());
    }

    #[test]
    fn unregistered_module_falls_back_only_when_allowed() {
        let registry = PluginRegistry::new();
        let ghost = PluginKey::new("nowhere", "ghost");
        assert!(registry.resolve_handler(&ghost, Action::FightFor, true).is_some());
        assert!(registry.resolve_handler(&ghost, Action::Give, true).is_none());
    }

    #[test]
    fn objective_resolution_never_falls_back() {
        let registry = PluginRegistry::from_manifest(&manifest()).unwrap();
        assert!(
            registry
                .resolve_objective(&PluginKey::new("quests", "items"))
                .is_some()
        );
        assert!(registry.resolve_objective(&giant_key()).is_none());
        assert!(
            registry
                .resolve_objective(&PluginKey::new("quests", "missing"))
                .is_none()
        );
    }

    #[test]
    fn duplicate_modules_are_rejected() {
        let spec = ModuleSpec::new("creatures", "giant", Category::Character);
        let manifest = Manifest::default()
            .with_module(spec.clone())
            .with_module(spec);
        assert!(matches!(
            PluginRegistry::from_manifest(&manifest),
            Err(PluginError::DuplicateModule(_))
        ));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let manifest = Manifest::default().with_module(
            ModuleSpec::new("creatures", "giant", Category::Character)
                .with_handler("steal", BehaviorSpec::new(BehaviorName::Accept)),
        );
        assert!(matches!(
            PluginRegistry::from_manifest(&manifest),
            Err(PluginError::UnknownAction(_))
        ));
    }

    #[test]
    fn item_catalog_lookups() {
        let registry = PluginRegistry::from_manifest(&manifest()).unwrap();
        let sword = Item::new("short sword", "arms", "blades");
        assert_eq!(registry.item_damage(&sword), Some(5));
        assert_eq!(registry.item_damage(&sword.clone().with_damage(9)), Some(9));
        assert_eq!(registry.item_name(&sword), "short sword");

        let stick = Item::new("stick", "arms", "blades");
        assert_eq!(registry.item_damage(&stick), None);
    }
}
