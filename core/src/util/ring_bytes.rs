use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Fixed-capacity byte buffer that keeps only the most recent bytes.
/// Shared between a stream pump thread and the launcher.
#[derive(Clone)]
pub struct RingBytes {
    inner: Arc<Mutex<VecDeque<u8>>>,
    cap: usize,
}

impl RingBytes {
    pub fn new(cap: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(cap))),
            cap,
        })
    }

    pub fn push(&self, data: &[u8]) {
        if self.cap == 0 {
            return;
        }
        let mut g = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let data = if data.len() > self.cap {
            &data[data.len() - self.cap..]
        } else {
            data
        };
        let overflow = g.len().saturating_add(data.len()).saturating_sub(self.cap);
        if overflow > 0 {
            g.drain(..overflow);
        }
        g.extend(data);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let g = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut vec = Vec::with_capacity(g.len());
        vec.extend(g.iter().copied());
        vec
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_tail_across_pushes() {
        let ring = RingBytes::new(5);
        ring.push(b"abc");
        ring.push(b"defg");
        assert_eq!(ring.to_bytes(), b"cdefg");
    }

    #[test]
    fn oversized_push_keeps_last_bytes() {
        let ring = RingBytes::new(3);
        ring.push(b"solver done");
        assert_eq!(ring.to_string_lossy(), "one");
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let ring = RingBytes::new(0);
        ring.push(b"anything");
        assert!(ring.to_bytes().is_empty());
    }
}
