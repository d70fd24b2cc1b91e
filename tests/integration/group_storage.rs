use dataroom::config::StorageConfig;
use dataroom::error::ApiError;
use dataroom::group::{PermissionGroupService, XdgGroupRepository};
use dataroom::permission::{Collaborator, FileFlag, PermissionGroup};
use dataroom::workspace::PermissionWorkspace;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::support::{sample_listing, with_xdg_env};

fn service(temp: &TempDir) -> PermissionGroupService {
    PermissionGroupService::new(Arc::new(XdgGroupRepository::new(temp.path().join("groups"))))
}

#[test]
fn edited_workspace_survives_a_save_and_reload() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    service
        .create("room", &PermissionGroup::new("legal", "Legal"))
        .unwrap();

    let mut ws = PermissionWorkspace::from_listing(&sample_listing(), service.get("room", "legal").unwrap());
    ws.edit_child_file_flag("Home/Reports", FileFlag::DownloadAccess, true)
        .unwrap();
    ws.edit_file_flag("Home/notes.txt", FileFlag::EditAccess, true)
        .unwrap();
    ws.set_visibility("Home/Reports", true).unwrap();
    service.save("room", ws.group()).unwrap();

    let reloaded = PermissionWorkspace::from_listing(
        &sample_listing(),
        service.get("room", "legal").unwrap(),
    );
    assert_eq!(reloaded.group(), ws.group());
    assert!(reloaded.resolve_file("Home/Reports/q1.pdf").unwrap().download_access);
    assert!(reloaded.is_customized("Home/notes.txt"));
    assert_eq!(reloaded.deviators(), ws.deviators());
}

#[test]
fn group_in_use_cannot_be_deleted() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    service
        .create("room", &PermissionGroup::new("legal", "Legal"))
        .unwrap();
    service
        .assign("room", Collaborator::new("ana", "legal"))
        .unwrap();

    let err = service.delete("room", "legal").unwrap_err();
    assert_eq!(err.to_string(), "Permission group legal is in use by: ana");
    assert!(service.get("room", "legal").is_ok());

    assert!(service.unassign("room", "ana").unwrap());
    service.delete("room", "legal").unwrap();
    assert!(matches!(
        service.get("room", "legal"),
        Err(ApiError::GroupNotFound(_))
    ));
}

#[test]
fn datarooms_are_isolated() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    service
        .create("room-a", &PermissionGroup::new("legal", "Legal"))
        .unwrap();
    assert!(service.load("room-b").unwrap().is_empty());
    service
        .create("room-b", &PermissionGroup::new("legal", "Legal B"))
        .unwrap();
    assert_eq!(service.get("room-a", "legal").unwrap().name, "Legal");
}

#[test]
fn default_storage_root_is_under_xdg_data_home() {
    let temp = TempDir::new().unwrap();
    with_xdg_env(&temp, || {
        let repo = XdgGroupRepository::from_config(&StorageConfig::default()).unwrap();
        assert_eq!(repo.root(), temp.path().join("data/dataroom/datarooms"));
    });
}
