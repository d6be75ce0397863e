use super::{json_mock, mock_server, API_KEY};
use crate::model::decode;
use crate::resources::files::{FileEntry, Location, SliceRequest, UploadRequest};
use crate::OctoPrintError;
use mockito::Matcher;
use serde_json::json;

const LISTING: &str = r#"{
    "files": [
        {
            "name": "cube.gcode",
            "path": "cube.gcode",
            "type": "machinecode",
            "typePath": ["machinecode", "gcode"],
            "origin": "local",
            "size": 1024
        },
        {
            "name": "parts",
            "path": "parts",
            "type": "folder",
            "typePath": ["folder"],
            "children": [
                {
                    "name": "bracket.stl",
                    "path": "parts/bracket.stl",
                    "type": "model",
                    "typePath": ["model", "stl"],
                    "origin": "local"
                }
            ]
        }
    ],
    "free": 1000000,
    "total": 2000000
}"#;

#[tokio::test]
async fn test_list_recursive() {
    let (mut server, client) = mock_server().await;
    let mock = server
        .mock("GET", "/api/files/local")
        .match_query(Matcher::UrlEncoded("recursive".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LISTING)
        .create_async()
        .await;

    let list = client.files().list_location(Location::Local, true).await.unwrap();
    assert_eq!(list.iter_recursive().count(), 3);
    let bracket = list.find("parts/bracket.stl").unwrap();
    assert!(!bracket.is_printable());
    assert_eq!(bracket.type_path, vec!["model", "stl"]);
    assert_eq!(list.free, Some(1000000));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_without_recursion() {
    let (mut server, client) = mock_server().await;
    let mock = server
        .mock("GET", "/api/files")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"files": {"name": "only.gcode", "path": "only.gcode", "type": "machinecode"}}"#)
        .create_async()
        .await;

    let list = client.files().list(false).await.unwrap();
    assert_eq!(list.files.len(), 1);
    assert!(list.files[0].is_printable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload() {
    let (mut server, client) = mock_server().await;
    let mock = server
        .mock("POST", "/api/files/local")
        .match_header("x-api-key", API_KEY)
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="cube.gcode""#.to_string()),
            Matcher::Regex("G28".to_string()),
            Matcher::Regex(r#"name="select""#.to_string()),
            Matcher::Regex(r#"name="path""#.to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "done": true,
                "effectiveSelect": true,
                "files": {
                    "local": {
                        "name": "cube.gcode",
                        "origin": "local",
                        "path": "prints/cube.gcode",
                        "refs": {"resource": "http://example.com/api/files/local/prints/cube.gcode"}
                    }
                }
            }"#,
        )
        .create_async()
        .await;

    let request = UploadRequest::new("cube.gcode", "G28\n").in_folder("prints").select();
    let response = client.files().upload(Location::Local, request).await.unwrap();
    assert!(response.done);
    assert_eq!(response.effective_select, Some(true));
    assert_eq!(response.files["local"].path, "prints/cube.gcode");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_file_from_disk() {
    let (mut server, client) = mock_server().await;
    let dir = std::env::temp_dir().join(format!("octoprint-client-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let local = dir.join("benchy.gcode");
    tokio::fs::write(&local, "M104 S210\n").await.unwrap();

    let mock = server
        .mock("POST", "/api/files/sdcard")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="benchy.gcode""#.to_string()),
            Matcher::Regex("M104 S210".to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"done": false, "files": {"sdcard": {"name": "benchy.gcode", "origin": "sdcard"}}}"#)
        .create_async()
        .await;

    let response = client
        .files()
        .upload_file(Location::SdCard, &local, None)
        .await
        .unwrap();
    assert!(!response.done);
    assert_eq!(response.files["sdcard"].origin, Some(Location::SdCard));
    mock.assert_async().await;

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_upload_missing_local_file() {
    let (_server, client) = mock_server().await;
    let err = client
        .files()
        .upload_file(Location::Local, "/definitely/not/here.gcode", None)
        .await
        .unwrap_err();
    assert!(matches!(err, OctoPrintError::Io(_)));
}

#[tokio::test]
async fn test_create_folder() {
    let (mut server, client) = mock_server().await;
    let mock = server
        .mock("POST", "/api/files/local")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="foldername""#.to_string()),
            Matcher::Regex("archive".to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"done": true, "folder": {"name": "archive", "path": "archive", "origin": "local"}}"#)
        .create_async()
        .await;

    let response = client
        .files()
        .create_folder(Location::Local, "archive", None)
        .await
        .unwrap();
    assert!(response.done);
    assert_eq!(response.folder.unwrap().name, "archive");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_file_commands() {
    let (mut server, client) = mock_server().await;
    let select = server
        .mock("POST", "/api/files/local/parts/cube.gcode")
        .match_body(Matcher::Json(json!({"command": "select", "print": true})))
        .with_status(204)
        .create_async()
        .await;
    let move_to = server
        .mock("POST", "/api/files/local/cube.gcode")
        .match_body(Matcher::Json(json!({"command": "move", "destination": "archive"})))
        .with_status(204)
        .create_async()
        .await;
    let slice = server
        .mock("POST", "/api/files/local/bracket.stl")
        .match_body(Matcher::Json(json!({
            "command": "slice",
            "slicer": "curalegacy",
            "gcode": "bracket.gcode",
            "printerProfile": "_default"
        })))
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(r#"{"done": false}"#)
        .create_async()
        .await;

    client
        .files()
        .select(Location::Local, "parts/cube.gcode", true)
        .await
        .unwrap();
    client
        .files()
        .move_to(Location::Local, "cube.gcode", "archive")
        .await
        .unwrap();
    let request = SliceRequest {
        slicer: Some("curalegacy".into()),
        gcode: Some("bracket.gcode".into()),
        printer_profile: Some("_default".into()),
        ..Default::default()
    };
    client
        .files()
        .slice(Location::Local, "bracket.stl", &request)
        .await
        .unwrap();

    select.assert_async().await;
    move_to.assert_async().await;
    slice.assert_async().await;
}

#[tokio::test]
async fn test_delete() {
    let (mut server, client) = mock_server().await;
    let mock = server
        .mock("DELETE", "/api/files/local/cube.gcode")
        .with_status(204)
        .create_async()
        .await;

    client.files().delete(Location::Local, "cube.gcode").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_follows_refs() {
    let (mut server, client) = mock_server().await;
    let link = format!("{}/downloads/files/local/cube.gcode", server.url());
    let entry: FileEntry = decode(json!({
        "name": "cube.gcode",
        "path": "cube.gcode",
        "refs": {"download": link}
    }))
    .unwrap();
    server
        .mock("GET", "/downloads/files/local/cube.gcode")
        .with_status(200)
        .with_body("G28\n")
        .create_async()
        .await;

    let bytes = client.files().download(&entry).await.unwrap();
    assert_eq!(&bytes[..], b"G28\n");

    let no_link: FileEntry = decode(json!({"name": "x.gcode", "path": "x.gcode"})).unwrap();
    assert!(matches!(
        client.files().download(&no_link).await,
        Err(OctoPrintError::MissingLink(_))
    ));
}

#[tokio::test]
async fn test_get_single_entry() {
    let (mut server, client) = mock_server().await;
    json_mock(
        &mut server,
        "GET",
        "/api/files/local/cube.gcode",
        r#"{
            "name": "cube.gcode",
            "display": "Cube",
            "path": "cube.gcode",
            "type": "machinecode",
            "gcodeAnalysis": {"estimatedPrintTime": 1188.8, "filament": {"tool0": {"length": 810.5, "volume": 5.8}}},
            "prints": {"success": 4, "failure": 0}
        }"#,
    )
    .await;

    let entry = client.files().get(Location::Local, "cube.gcode").await.unwrap();
    assert_eq!(entry.display_name(), "Cube");
    let analysis = entry.gcode_analysis.unwrap();
    assert_eq!(analysis.estimated_print_time, Some(1188.8));
    assert_eq!(entry.prints.unwrap().success, 4);
}

#[tokio::test]
async fn test_unselect_copy_and_analyse() {
    let (mut server, client) = mock_server().await;
    let unselect = server
        .mock("POST", "/api/files/local/cube.gcode")
        .match_body(Matcher::Json(json!({"command": "unselect"})))
        .with_status(204)
        .create_async()
        .await;
    let copy = server
        .mock("POST", "/api/files/local/cube.gcode")
        .match_body(Matcher::Json(json!({"command": "copy", "destination": "archive"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "cube.gcode", "path": "archive/cube.gcode", "origin": "local"}"#)
        .create_async()
        .await;
    let analyse = server
        .mock("POST", "/api/files/local/parts/bracket.gcode")
        .match_body(Matcher::Json(json!({"command": "analyse"})))
        .with_status(204)
        .create_async()
        .await;

    client.files().unselect(Location::Local, "cube.gcode").await.unwrap();
    client
        .files()
        .copy(Location::Local, "cube.gcode", "archive")
        .await
        .unwrap();
    client
        .files()
        .analyse(Location::Local, "parts/bracket.gcode")
        .await
        .unwrap();

    unselect.assert_async().await;
    copy.assert_async().await;
    analyse.assert_async().await;
}
