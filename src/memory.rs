use crate::error::MemoryError;

// NB. addresses are u8 as per the LS-8; capacities are usize to stop endless casting

/// how much RAM the reference machine has
pub const RAM_SIZE_BYTES: usize = 256;

/// interrupt vector table: one handler address per line, 0xf8..=0xff
pub const VECTOR_TABLE_ADDR: u8 = 0xf8;

/// initial stack pointer; the stack grows downward from just below the vectors
pub const STACK_INIT: u8 = 0xf8;

/// Byte-addressable store consumed by the CPU.
pub trait Memory {
    /// number of addressable bytes
    fn capacity(&self) -> usize;

    /// read one byte
    fn read(&self, addr: u8) -> Result<u8, MemoryError>;

    /// write one byte
    fn write(&mut self, addr: u8, value: u8) -> Result<(), MemoryError>;

    /// read at a computed address, which may run past the end of memory
    fn read_at(&self, addr: usize) -> Result<u8, MemoryError> {
        if addr >= self.capacity() {
            return Err(MemoryError::OutOfRange {
                address: addr,
                capacity: self.capacity(),
            });
        }
        self.read(addr as u8)
    }

    /// write a chunk of bytes sequentially, starting at `addr`
    fn load(&mut self, data: &[u8], addr: u8) -> Result<(), MemoryError> {
        for (offset, byte) in data.iter().enumerate() {
            let a = addr as usize + offset;
            if a >= self.capacity() {
                return Err(MemoryError::OutOfRange {
                    address: a,
                    capacity: self.capacity(),
                });
            }
            self.write(a as u8, *byte)?;
        }
        Ok(())
    }
}

/// Flat RAM. Layout of the 256 byte configuration:
///   0x00-0xf7  program, data and the downward-growing stack
///   0xf8-0xff  interrupt vector table
pub struct Ram {
    bytes: Box<[u8]>,
}

impl Ram {
    /// zeroed RAM of the given size; at most 256 bytes can be addressed
    pub fn new(capacity: usize) -> Result<Self, MemoryError> {
        if capacity == 0 || capacity > RAM_SIZE_BYTES {
            return Err(MemoryError::BadCapacity(capacity));
        }
        Ok(Ram {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        })
    }

    fn check(&self, addr: u8) -> Result<usize, MemoryError> {
        let a = addr as usize;
        if a < self.bytes.len() {
            Ok(a)
        } else {
            Err(MemoryError::OutOfRange {
                address: a,
                capacity: self.bytes.len(),
            })
        }
    }

    /// r/o view of the whole store
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Ram {
    fn default() -> Self {
        Ram {
            bytes: Box::new([0u8; RAM_SIZE_BYTES]),
        }
    }
}

impl Memory for Ram {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, addr: u8) -> Result<u8, MemoryError> {
        let a = self.check(addr)?;
        Ok(self.bytes[a])
    }

    fn write(&mut self, addr: u8, value: u8) -> Result<(), MemoryError> {
        let a = self.check(addr)?;
        self.bytes[a] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Ram::default();
        assert_eq!(m.as_slice(), &[0; 256][..]);
    }

    #[test]
    fn test_read_write() -> Result<(), MemoryError> {
        let mut m = Ram::default();
        m.write(0x42, 0x99)?;
        assert_eq!(m.read(0x42)?, 0x99);
        m.write(0xff, 1)?;
        assert_eq!(m.read(0xff)?, 1);
        Ok(())
    }

    #[test]
    fn test_load_slice_ok() -> Result<(), MemoryError> {
        let mut m = Ram::default();
        m.load(&[0, 1, 2, 3, 4, 5, 6, 7], 8)?;
        assert_eq!(
            m.as_slice()[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_load_too_much() {
        let mut m = Ram::default();
        let err = m.load(&[0; 8], 0xfc).unwrap_err();
        assert_eq!(
            err,
            MemoryError::OutOfRange {
                address: 256,
                capacity: 256
            }
        );
    }

    #[test]
    fn test_small_ram_out_of_range() -> Result<(), MemoryError> {
        let mut m = Ram::new(16)?;
        assert_eq!(m.capacity(), 16);
        assert!(m.read(15).is_ok());
        assert_eq!(
            m.read(16),
            Err(MemoryError::OutOfRange {
                address: 16,
                capacity: 16
            })
        );
        assert!(m.write(0xf8, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_read_at_past_the_end() -> Result<(), MemoryError> {
        let mut m = Ram::default();
        m.write(0xff, 7)?;
        assert_eq!(m.read_at(0xff)?, 7);
        assert_eq!(
            m.read_at(0x100),
            Err(MemoryError::OutOfRange {
                address: 256,
                capacity: 256
            })
        );
        Ok(())
    }

    #[test]
    fn test_bad_capacity() {
        assert!(matches!(Ram::new(0), Err(MemoryError::BadCapacity(0))));
        assert!(matches!(Ram::new(257), Err(MemoryError::BadCapacity(257))));
    }

    #[test]
    fn test_mem_layout() {
        assert_eq!(VECTOR_TABLE_ADDR, 0xf8);
        assert_eq!(STACK_INIT, VECTOR_TABLE_ADDR);
    }
}
