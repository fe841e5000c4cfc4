use std::io::{self, Cursor, ErrorKind, Read};

/// Readable key material that knows how many bytes it holds.
pub trait KeySource: Read {
    /// Number of bytes still available to read.
    fn declared_len(&self) -> usize;
}

impl<T: AsRef<[u8]>> KeySource for Cursor<T> {
    fn declared_len(&self) -> usize {
        let total = self.get_ref().as_ref().len();
        total.saturating_sub(self.position() as usize)
    }
}

impl<S: KeySource + ?Sized> KeySource for &mut S {
    fn declared_len(&self) -> usize {
        (**self).declared_len()
    }
}

/// Drain `source` into a buffer sized to its declared length.
///
/// Stops on end of input or once the buffer is full. Interrupted reads are
/// retried, every other error is returned unchanged.
pub fn read_all<S: KeySource + ?Sized>(source: &mut S) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; source.declared_len()];
    let mut filled = 0;
    loop {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}
