#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use depad_core::padding::{BlockDepadder, PaddingError, PaddingScheme};
    use depad_core::stream::DepadReader;
    use futures::executor::block_on;

    fn plaintext(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8 + 1).collect()
    }

    fn padded(len: usize, block_size: usize) -> (Vec<u8>, Vec<u8>) {
        let plain = plaintext(len);
        let padded = PaddingScheme::Pkcs7.pad(&plain, block_size).unwrap();
        (plain, padded)
    }

    /// Drain a reader with a fixed caller buffer size.
    fn read_all_with<R: Read>(reader: &mut R, buf_size: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; buf_size];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Source that returns short reads and an `Interrupted` before each one.
    struct Stuttering {
        data: Vec<u8>,
        pos: usize,
        interrupt_next: bool,
    }

    impl Read for Stuttering {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt_next = !self.interrupt_next;
            if self.interrupt_next {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
            }
            let n = buf.len().min(3).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn output_is_independent_of_read_and_chunk_sizes() {
        let (plain, padded) = padded(1000, 16);
        for chunk_size in [1, 7, 16, 17, 4096] {
            for buf_size in [1, 5, 16, 64, 2048] {
                let depadder = BlockDepadder::new(PaddingScheme::Pkcs7, 16).unwrap();
                let mut reader = DepadReader::with_depadder(Cursor::new(padded.clone()), depadder, chunk_size);
                let out = read_all_with(&mut reader, buf_size).unwrap();
                assert_eq!(out, plain, "chunk={chunk_size} buf={buf_size}");
            }
        }
    }

    #[test]
    fn read_after_end_keeps_returning_zero() {
        let (plain, padded) = padded(10, 8);
        let mut reader = DepadReader::new(Cursor::new(padded), PaddingScheme::Pkcs7, 8).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, plain);
        assert!(reader.is_finished());

        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn empty_caller_buffer_reads_nothing() {
        let (_, padded) = padded(10, 8);
        let mut reader = DepadReader::new(Cursor::new(padded), PaddingScheme::Pkcs7, 8).unwrap();
        assert_eq!(reader.read(&mut []).unwrap(), 0);
        assert_eq!(reader.counters().bytes_in, 0);
    }

    #[test]
    fn empty_source_yields_empty_output() {
        let mut reader = DepadReader::new(Cursor::new(Vec::<u8>::new()), PaddingScheme::Iso7816_4, 16).unwrap();
        let mut out = Vec::new();
        assert_eq!(reader.read_to_end(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn truncated_source_is_invalid_data() {
        let (_, padded) = padded(30, 16);
        let truncated = padded[..padded.len() - 3].to_vec();
        let mut reader = DepadReader::new(Cursor::new(truncated), PaddingScheme::Pkcs7, 16).unwrap();

        let err = read_all_with(&mut reader, 64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(
            PaddingError::from_io(&err),
            Some(&PaddingError::Alignment { held: 13, block_size: 16 })
        );
    }

    #[test]
    fn bad_padding_surfaces_on_last_read() {
        let mut padded = padded(30, 16).1;
        *padded.last_mut().unwrap() = 0x20;
        let mut reader = DepadReader::new(Cursor::new(padded), PaddingScheme::Pkcs7, 16).unwrap();
        let err = read_all_with(&mut reader, 8).unwrap_err();
        assert!(matches!(
            PaddingError::from_io(&err),
            Some(PaddingError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn interrupted_source_is_retried() {
        let (plain, padded) = padded(100, 8);
        let source = Stuttering { data: padded, pos: 0, interrupt_next: false };
        let mut reader = DepadReader::new(source, PaddingScheme::Pkcs7, 8).unwrap();
        assert_eq!(read_all_with(&mut reader, 10).unwrap(), plain);
    }

    #[test]
    fn counters_track_the_stream() {
        let (plain, padded) = padded(64, 16);
        let mut reader = DepadReader::new(Cursor::new(padded.clone()), PaddingScheme::Pkcs7, 16).unwrap();
        read_all_with(&mut reader, 32).unwrap();
        let c = reader.counters();
        assert_eq!(c.bytes_in, padded.len() as u64);
        assert_eq!(c.bytes_out, plain.len() as u64);
        assert_eq!(c.padding_bytes, 16);
        assert_eq!(c.pending_bytes(), 0);
    }

    #[test]
    fn into_inner_returns_source() {
        let (_, padded) = padded(5, 8);
        let len = padded.len() as u64;
        let mut reader = DepadReader::new(Cursor::new(padded), PaddingScheme::Pkcs7, 8).unwrap();
        read_all_with(&mut reader, 4).unwrap();
        assert_eq!(reader.into_inner().position(), len);
    }

    // --- Async ---

    #[test]
    fn async_matches_sync() {
        let (plain, padded) = padded(777, 16);
        for chunk_size in [1, 15, 16, 33, 4096] {
            let depadder = BlockDepadder::new(PaddingScheme::Pkcs7, 16).unwrap();
            let mut sync_reader =
                DepadReader::with_depadder(Cursor::new(padded.clone()), depadder, chunk_size);
            let sync_out = read_all_with(&mut sync_reader, 100).unwrap();

            let depadder = BlockDepadder::new(PaddingScheme::Pkcs7, 16).unwrap();
            let mut async_reader = DepadReader::with_depadder(
                futures::io::Cursor::new(padded.clone()),
                depadder,
                chunk_size,
            );
            let mut async_out = Vec::new();
            block_on(async_reader.read_to_end_async(&mut async_out)).unwrap();

            assert_eq!(sync_out, plain);
            assert_eq!(async_out, sync_out, "chunk={chunk_size}");
        }
    }

    #[test]
    fn async_small_reads() {
        let (plain, padded) = padded(50, 8);
        let mut reader =
            DepadReader::new(futures::io::Cursor::new(padded), PaddingScheme::Pkcs7, 8).unwrap();
        let out = block_on(async {
            let mut out = Vec::new();
            let mut buf = [0u8; 3];
            loop {
                let n = reader.read_async(&mut buf).await?;
                if n == 0 {
                    break;
                }
                out.extend_from_slice(&buf[..n]);
            }
            Ok::<_, io::Error>(out)
        })
        .unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn async_truncated_source_fails() {
        let (_, padded) = padded(20, 8);
        let truncated = padded[..padded.len() - 1].to_vec();
        let mut reader =
            DepadReader::new(futures::io::Cursor::new(truncated), PaddingScheme::Pkcs7, 8).unwrap();
        let mut out = Vec::new();
        let err = block_on(reader.read_to_end_async(&mut out)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
