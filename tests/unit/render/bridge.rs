use base64::Engine as _;

use super::*;
use crate::material::MaterialTable;

fn png_b64(res: Resolution, rgba: [u8; 4]) -> String {
    let png = FrameRGBA::solid(res, rgba).to_png().unwrap();
    base64::engine::general_purpose::STANDARD.encode(png)
}

#[test]
fn render_request_is_tagged_json_line() {
    let table = MaterialTable::builtin();
    let scene = SceneRecipe::for_material(table.get("platinum").unwrap());
    let req = BridgeRequest::Render {
        id: 7,
        model: "data:model/gltf-binary;base64,Z2xURg==",
        scene: &scene,
        rotation_y_rad: 0.5,
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["op"], "render");
    assert_eq!(v["id"], 7);
    assert_eq!(v["model"], "data:model/gltf-binary;base64,Z2xURg==");
    assert_eq!(v["scene"]["exposure"].as_f64().unwrap() as f32, crate::scene::EXPOSURE);

    let init = serde_json::to_string(&BridgeRequest::Init {
        width: 4,
        height: 4,
    })
    .unwrap();
    assert_eq!(init, r#"{"op":"init","width":4,"height":4}"#);
    let close = serde_json::to_string(&BridgeRequest::Close).unwrap();
    assert_eq!(close, r#"{"op":"close"}"#);
}

#[test]
fn responses_parse_with_optional_fields() {
    let ready = parse_response("{\"ok\":true,\"ready\":true}\n").unwrap();
    assert!(ready.ok && ready.ready);
    assert!(ready.id.is_none());

    let failed = parse_response(r#"{"id":3,"ok":false,"error":"timeout"}"#).unwrap();
    assert_eq!(failed.id, Some(3));
    assert!(!failed.ok);

    assert!(parse_response("not json").is_err());
}

#[test]
fn only_json_objects_count_as_responses() {
    assert!(is_response_line("{\"ok\":true,\"ready\":true}\n"));
    assert!(is_response_line("  {\"id\":1,\"ok\":true}"));
    assert!(!is_response_line("THREE.WebGLRenderer: context lost\n"));
    assert!(!is_response_line("[info] loading scene"));
    assert!(!is_response_line("\n"));
}

#[test]
fn frame_from_response_decodes_snapshot() {
    let res = Resolution::square(4);
    let resp = BridgeResponse {
        id: Some(2),
        ok: true,
        ready: false,
        png_base64: Some(png_b64(res, [10, 20, 30, 255])),
        error: None,
    };
    let frame = frame_from_response(resp, 2, res).unwrap();
    assert_eq!(frame.resolution(), res);
    assert_eq!(&frame.data[..4], &[10, 20, 30, 255]);
}

#[test]
fn frame_from_response_rejects_bad_answers() {
    let res = Resolution::square(4);

    let wrong_id = BridgeResponse {
        id: Some(9),
        ok: true,
        ready: false,
        png_base64: Some(png_b64(res, [0, 0, 0, 255])),
        error: None,
    };
    assert!(frame_from_response(wrong_id, 1, res).is_err());

    let backend_error = BridgeResponse {
        id: Some(1),
        ok: false,
        ready: false,
        png_base64: None,
        error: Some("webgl context lost".to_string()),
    };
    let err = frame_from_response(backend_error, 1, res).unwrap_err();
    assert!(err.to_string().contains("webgl context lost"));
    assert!(!err.is_fatal());

    let wrong_size = BridgeResponse {
        id: None,
        ok: true,
        ready: false,
        png_base64: Some(png_b64(Resolution::square(2), [0, 0, 0, 255])),
        error: None,
    };
    assert!(frame_from_response(wrong_size, 1, res).is_err());

    let garbage = BridgeResponse {
        id: None,
        ok: true,
        ready: false,
        png_base64: Some("@@@".to_string()),
        error: None,
    };
    assert!(frame_from_response(garbage, 1, res).is_err());
}

#[test]
fn missing_renderer_is_fatal() {
    let mut backend = BridgeBackend::new(BridgeOpts {
        program: PathBuf::from("turntable-renderer-that-does-not-exist"),
        args: vec![],
        resolution: Resolution::square(4),
    });
    let model = ModelAsset::from_bytes("m", "m.glb", b"glTF\x02\0\0\0".to_vec()).unwrap();
    let table = MaterialTable::builtin();
    let err = backend
        .begin_sequence(&model, table.get("platinum").unwrap())
        .unwrap_err();
    assert!(err.is_fatal(), "unexpected error: {err}");

    // No session was opened, so frames fail without panicking and teardown is a no-op.
    assert!(
        backend
            .render_frame(&model, table.get("platinum").unwrap(), 0.0)
            .is_err()
    );
    backend.end_sequence().unwrap();
}
