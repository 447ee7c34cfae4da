extern crate std;

use std::io::{IoSlice, Write};

use crate::VlVec;

/// Write is implemented for `VlVec<u8, N>` by appending to the vector.
/// The vector will grow as needed, following the usual growth rule.
impl<const N: usize> Write for VlVec<u8, N> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> std::io::Result<usize> {
        let num = bufs.iter().map(|b| b.len()).sum::<usize>();

        // One growth for the whole batch.
        self.reserve(num);
        for buf in bufs {
            self.extend_from_slice(buf);
        }

        Ok(num)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        Write::write(self, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vlvec;

    #[test]
    fn write_and_vectored() {
        let mut v: VlVec<u8, 4> = VlVec::new();

        let n = v.write(b"hell").unwrap();
        assert_eq!(n, 4);
        assert!(v.is_inline());

        let n = v.write(b"o").unwrap();
        assert_eq!(n, 1);
        assert_eq!(v.len(), 5);
        assert_eq!(v, b"hello");
        assert!(!v.is_inline());

        let bufs = [IoSlice::new(b" "), IoSlice::new(b"world")];
        let n = v.write_vectored(&bufs).unwrap();
        assert_eq!(n, 6);
        assert_eq!(v, b"hello world");
    }

    #[test]
    fn write_vectored_grows_once() {
        let mut v: VlVec<u8, 2> = vlvec![b'>'];
        let bufs = [IoSlice::new(b"ab"), IoSlice::new(b"cde"), IoSlice::new(b"f")];
        let n = v.write_vectored(&bufs).unwrap();
        assert_eq!(n, 6);
        assert_eq!(v, b">abcdef");
        assert_eq!(v.capacity(), 10);
    }

    #[test]
    fn write_all_grows() {
        let mut v: VlVec<u8, 3> = VlVec::new();
        let data = [b'x'; 257];
        v.write_all(&data).unwrap();
        assert_eq!(v.len(), 257);
        assert!(v.as_slice().iter().all(|&c| c == b'x'));
    }

    #[test]
    fn formatted_write() {
        let mut v: VlVec<u8, 16> = VlVec::new();
        write!(v, "{}-{}", 12, "ab").unwrap();
        assert_eq!(v, b"12-ab");
        assert!(v.is_inline());
    }
}
