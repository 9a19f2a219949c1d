use super::*;

#[derive(Default)]
struct Counting {
    begins: usize,
    ends: usize,
    fail_end: bool,
}

impl RenderBackend for Counting {
    fn begin_sequence(
        &mut self,
        _model: &ModelAsset,
        _material: &MaterialPreset,
    ) -> TurntableResult<()> {
        self.begins += 1;
        Ok(())
    }

    fn render_frame(
        &mut self,
        _model: &ModelAsset,
        _material: &MaterialPreset,
        angle_deg: f64,
    ) -> TurntableResult<FrameRGBA> {
        if angle_deg > 180.0 {
            return Err(TurntableError::render("too far"));
        }
        Ok(FrameRGBA::solid(Resolution::square(2), [1, 2, 3, 255]))
    }

    fn end_sequence(&mut self) -> TurntableResult<()> {
        self.ends += 1;
        if self.fail_end {
            return Err(TurntableError::session("close failed"));
        }
        Ok(())
    }
}

fn model() -> ModelAsset {
    ModelAsset::from_bytes("ring", "ring.glb", b"glTF\x02\x00\x00\x00".to_vec()).unwrap()
}

#[test]
fn solid_frame_has_expected_layout() {
    let f = FrameRGBA::solid(Resolution { width: 3, height: 2 }, [9, 8, 7, 6]);
    assert_eq!(f.data.len(), 3 * 2 * 4);
    assert_eq!(&f.data[..4], &[9, 8, 7, 6]);
    f.validate().unwrap();
}

#[test]
fn png_snapshot_preserves_pixels() {
    let f = FrameRGBA::solid(Resolution::square(4), [200, 100, 50, 128]);
    let back = FrameRGBA::from_png(&f.to_png().unwrap()).unwrap();
    assert_eq!(back, f);
}

#[test]
fn mismatched_buffer_is_rejected() {
    let f = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 7],
    };
    assert!(f.validate().is_err());
    assert!(f.to_png().is_err());
    assert!(FrameRGBA::from_png(b"not a png").is_err());
}

#[test]
fn session_close_ends_once() {
    let mut backend = Counting::default();
    let m = model();
    let mat = MaterialPreset::new("platinum", 1.0, 0.15, [0.9, 0.89, 0.87]);
    {
        let mut session = SequenceSession::open(&mut backend, &m, &mat).unwrap();
        assert!(session.render(10.0).is_ok());
        assert!(session.render(270.0).is_err());
        session.close().unwrap();
    }
    assert_eq!(backend.begins, 1);
    assert_eq!(backend.ends, 1);
}

#[test]
fn dropped_session_still_ends() {
    let mut backend = Counting {
        fail_end: true,
        ..Counting::default()
    };
    let m = model();
    let mat = MaterialPreset::new("platinum", 1.0, 0.15, [0.9, 0.89, 0.87]);
    {
        let _session = SequenceSession::open(&mut backend, &m, &mat).unwrap();
    }
    assert_eq!(backend.ends, 1);
}
