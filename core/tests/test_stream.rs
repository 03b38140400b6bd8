#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};

    use depad_core::padding::{PaddingError, PaddingScheme};
    use depad_core::stream::{
        depad_reader, depad_stream, depad_to_vec, depad_writer, ApiConfig, DepadParams,
        InputSource, OutputSink,
    };
    use depad_core::types::StreamError;

    fn plaintext(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8 + 1).collect()
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn memory_to_memory_with_buffer() {
        init_logger();
        let plain = plaintext(10_000);
        let padded = PaddingScheme::Pkcs7.pad(&plain, 16).unwrap();
        let params = DepadParams::new(PaddingScheme::Pkcs7, 16);
        let config = ApiConfig::new(Some(1000), None, Some(true));

        let snap = depad_stream(InputSource::Memory(padded.clone()), OutputSink::Memory, params, config)
            .unwrap();

        assert_eq!(snap.output.as_deref(), Some(plain.as_slice()));
        assert_eq!(snap.bytes_in, padded.len() as u64);
        assert_eq!(snap.bytes_out, plain.len() as u64);
        assert_eq!(snap.padding_bytes, (padded.len() - plain.len()) as u64);
        assert!(snap.chunks_in >= 10);
        assert!(snap.sanity_check());
        assert!(snap.to_json().unwrap().contains("\"scheme\":\"pkcs7\""));
    }

    #[test]
    fn memory_sink_without_buffer_discards_output() {
        let padded = PaddingScheme::Pkcs5.pad(b"discarded", 8).unwrap();
        let snap = depad_stream(
            InputSource::Memory(padded),
            OutputSink::Memory,
            DepadParams::new(PaddingScheme::Pkcs5, 8),
            ApiConfig::default(),
        )
        .unwrap();
        assert!(snap.output.is_none());
        assert_eq!(snap.bytes_out, 9);
    }

    #[test]
    fn reader_and_writer_endpoints() {
        let plain = plaintext(300);
        let padded = PaddingScheme::Iso10126.pad(&plain, 32).unwrap();
        let (tx, rx) = std::sync::mpsc::channel::<Vec<u8>>();

        struct ChannelSink(std::sync::mpsc::Sender<Vec<u8>>);
        impl Write for ChannelSink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let _ = self.0.send(buf.to_vec());
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        depad_stream(
            InputSource::Reader(Box::new(Cursor::new(padded))),
            OutputSink::Writer(Box::new(ChannelSink(tx))),
            DepadParams::new(PaddingScheme::Iso10126, 32),
            ApiConfig::new(Some(64), None, None),
        )
        .unwrap();

        let out: Vec<u8> = rx.try_iter().flatten().collect();
        assert_eq!(out, plain);
    }

    #[test]
    fn file_source_and_sink() {
        let dir = std::env::temp_dir().join(format!("depad-stream-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let src = dir.join("padded.bin");
        let dst = dir.join("plain.bin");

        let plain = plaintext(5000);
        std::fs::write(&src, PaddingScheme::Iso7816_4.pad(&plain, 64).unwrap()).unwrap();

        let snap = depad_stream(
            InputSource::File(src.clone()),
            OutputSink::File(dst.clone()),
            DepadParams::new(PaddingScheme::Iso7816_4, 64),
            ApiConfig::default(),
        )
        .unwrap();

        assert_eq!(std::fs::read(&dst).unwrap(), plain);
        assert!(snap.sanity_check());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_chunk_size_is_rejected() {
        for bad in [0, 15, 2 * 1024 * 1024] {
            let err = depad_stream(
                InputSource::Memory(vec![8; 8]),
                OutputSink::Memory,
                DepadParams::new(PaddingScheme::Pkcs7, 8),
                ApiConfig::new(Some(bad), None, None),
            )
            .unwrap_err();
            assert!(matches!(err, StreamError::Validation(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn invalid_block_size_is_a_padding_error() {
        let err = depad_stream(
            InputSource::Memory(vec![8; 16]),
            OutputSink::Memory,
            DepadParams::new(PaddingScheme::Pkcs5, 16),
            ApiConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.padding(),
            Some(PaddingError::InvalidBlockSize { block_size: 16, .. })
        ));
    }

    #[test]
    fn truncated_input_surfaces_alignment() {
        let padded = PaddingScheme::Pkcs7.pad(&plaintext(40), 16).unwrap();
        let err = depad_stream(
            InputSource::Memory(padded[..padded.len() - 1].to_vec()),
            OutputSink::Memory,
            DepadParams::new(PaddingScheme::Pkcs7, 16),
            ApiConfig::default(),
        )
        .unwrap_err();
        match err {
            StreamError::Padding(PaddingError::Alignment { held, block_size }) => {
                assert_eq!((held, block_size), (15, 16));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = depad_stream(
            InputSource::File("/nonexistent/depad/input.bin".into()),
            OutputSink::Memory,
            DepadParams::new(PaddingScheme::Pkcs7, 16),
            ApiConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
    }

    // --- Params and config ---

    #[test]
    fn params_from_json() {
        let params = DepadParams::from_json(r#"{"scheme":"iso10126","block_size":16}"#).unwrap();
        assert_eq!(params, DepadParams::new(PaddingScheme::Iso10126, 16));

        assert!(matches!(
            DepadParams::from_json(r#"{"scheme":"pkcs5","block_size":16}"#),
            Err(StreamError::Padding(PaddingError::InvalidBlockSize { .. }))
        ));
        assert!(matches!(
            DepadParams::from_json(r#"{"scheme":"rot13","block_size":16}"#),
            Err(StreamError::Validation(_))
        ));
    }

    #[test]
    fn config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.chunk_size(), 4096);
        assert!(!config.leave_open());
        assert!(config.validate().is_ok());

        let parsed: ApiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.chunk_size(), 4096);
    }

    // --- Helpers ---

    #[test]
    fn depad_to_vec_one_shot() {
        let params = DepadParams::new(PaddingScheme::Zero, 8);
        assert_eq!(depad_to_vec(&params, b"ABC\0\0\0\0\0").unwrap(), b"ABC");
        assert!(depad_to_vec(&params, b"ABC").is_err());
        assert!(depad_to_vec(&params, b"").unwrap().is_empty());
    }

    #[test]
    fn depad_reader_helper() {
        let plain = plaintext(100);
        let padded = PaddingScheme::Pkcs7.pad(&plain, 8).unwrap();
        let params = DepadParams::new(PaddingScheme::Pkcs7, 8);
        let mut reader = depad_reader(Cursor::new(padded), &params, &ApiConfig::new(Some(16), None, None)).unwrap();
        assert_eq!(reader.chunk_size(), 16);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn depad_writer_helper_honours_leave_open() {
        let plain = plaintext(100);
        let padded = PaddingScheme::Pkcs7.pad(&plain, 8).unwrap();
        let params = DepadParams::new(PaddingScheme::Pkcs7, 8);
        let config = ApiConfig::new(None, Some(true), None);
        let mut writer = depad_writer(Vec::<u8>::new(), &params, &config).unwrap();
        writer.write_all(&padded).unwrap();
        writer.close().unwrap();
        assert_eq!(writer.into_inner(), Some(plain));
    }
}
