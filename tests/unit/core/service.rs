use super::*;
use crate::kernel::services::adapters::{SettingsService, ShellConfig, SimulatedShell};
use crate::kernel::services::ports::{SettingsPatch, ShellKind};

fn shell() -> SimulatedShell {
    SimulatedShell::new(ShellKind::Bash, ShellConfig::immediate())
}

#[test]
fn lookup_is_by_concrete_type() {
    let mut registry = ServiceRegistry::new();
    registry.register(shell()).unwrap();

    assert_eq!(registry.get::<SimulatedShell>().unwrap().kind(), ShellKind::Bash);
    assert!(registry.get::<SettingsService>().is_none());
}

#[test]
fn mutable_access_reaches_the_registered_instance() {
    let mut registry = ServiceRegistry::new();
    registry.register(SettingsService::in_memory()).unwrap();

    let patch = SettingsPatch {
        font_size: Some(20),
        ..SettingsPatch::default()
    };
    registry
        .get_mut::<SettingsService>()
        .unwrap()
        .update_settings(&patch)
        .unwrap();
    assert_eq!(
        registry.get::<SettingsService>().unwrap().get_settings().font_size,
        20
    );
}

#[test]
fn second_instance_of_a_type_is_rejected() {
    let mut registry = ServiceRegistry::new();
    let first = shell();
    first.create_session(None);
    registry.register(first).unwrap();

    assert!(matches!(
        registry.register(shell()),
        Err(ServiceError::AlreadyRegistered("SimulatedShell"))
    ));
    assert_eq!(registry.get::<SimulatedShell>().unwrap().session_count(), 1);
}

#[test]
fn require_names_the_missing_type() {
    let registry = ServiceRegistry::new();
    match registry.require::<SettingsService>() {
        Err(ServiceError::NotFound(name)) => assert!(name.ends_with("SettingsService")),
        _ => panic!("expected NotFound"),
    }
}

#[test]
fn names_list_registered_services() {
    let mut registry = ServiceRegistry::new();
    assert!(registry.names().is_empty());
    registry.register(shell()).unwrap();
    registry.register(SettingsService::in_memory()).unwrap();

    assert_eq!(registry.names(), vec!["SettingsService", "SimulatedShell"]);
    assert!(registry.contains::<SettingsService>());
}
