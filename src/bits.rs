use bitvec::prelude::*;

/// An append-only sink of bits. Bits are packed MSB-first into bytes.
pub trait BitSink {
    fn put_bit(&mut self, bit: bool);

    /// Appends `count` copies of `bit`.
    fn put_bits_repeat(&mut self, bit: bool, count: usize);

    /// Appends `*count` copies of `bit` and resets the counter to zero.
    #[inline(always)]
    fn put_bits_repeat_with_reset(&mut self, bit: bool, count: &mut usize) {
        self.put_bits_repeat(bit, *count);
        *count = 0;
    }

    fn put_byte(&mut self, byte: u8);

    /// Appends a big-endian `u64`.
    fn put_u64(&mut self, value: u64);

    /// Reserves room for a `u64` to be written later with [`write_u64_at`](Self::write_u64_at)
    /// and returns its bit offset.
    fn reserve_u64(&mut self) -> usize;

    /// Overwrites the `u64` stored at the given bit offset.
    fn write_u64_at(&mut self, offset: usize, value: u64);

    /// Number of bits written so far.
    fn bits_len(&self) -> usize;
}

/// A forward, seekable source of bits.
pub trait BitSource {
    /// Returns the next bit, or `false` once the source is exhausted.
    fn take_bit(&mut self) -> bool;

    fn take_byte(&mut self) -> u8;

    /// Reads a big-endian `u64`.
    fn take_u64(&mut self) -> u64;

    fn seek(&mut self, bit_offset: usize);

    /// The offset, in bits, of the next bit to be read.
    fn position(&self) -> usize;
}

/// A [`BitSink`] backed by a growable bit vector.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        self.bits.as_bitslice()
    }

    /// Returns the written bytes; the last byte is padded with zeros.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.bits.set_uninitialized(false);
        self.bits.into_vec()
    }
}

impl BitSink for BitWriter {
    #[inline(always)]
    fn put_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    #[inline(always)]
    fn put_bits_repeat(&mut self, bit: bool, count: usize) {
        let len = self.bits.len();
        self.bits.resize(len + count, bit);
    }

    fn put_byte(&mut self, byte: u8) {
        self.bits.extend_from_bitslice(byte.view_bits::<Msb0>());
    }

    fn put_u64(&mut self, value: u64) {
        self.bits.extend_from_bitslice(value.to_be_bytes().view_bits::<Msb0>());
    }

    fn reserve_u64(&mut self) -> usize {
        let offset = self.bits.len();
        self.put_bits_repeat(false, u64::BITS as usize);
        offset
    }

    fn write_u64_at(&mut self, offset: usize, value: u64) {
        let target = &mut self.bits[offset..offset + u64::BITS as usize];
        target.copy_from_bitslice(value.to_be_bytes().view_bits::<Msb0>());
    }

    #[inline(always)]
    fn bits_len(&self) -> usize {
        self.bits.len()
    }
}

/// A [`BitSource`] reading a borrowed byte buffer MSB-first.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: BitSlice::from_slice(bytes),
            position: 0,
        }
    }

    /// Number of bits still available before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.position)
    }
}

impl BitSource for BitReader<'_> {
    #[inline(always)]
    fn take_bit(&mut self) -> bool {
        let bit = self.bits.get(self.position).map_or(false, |bit| *bit);
        self.position += 1;
        bit
    }

    fn take_byte(&mut self) -> u8 {
        (0..u8::BITS).fold(0, |byte, _| (byte << 1) | self.take_bit() as u8)
    }

    fn take_u64(&mut self) -> u64 {
        (0..u64::BITS).fold(0, |value, _| (value << 1) | self.take_bit() as u64)
    }

    fn seek(&mut self, bit_offset: usize) {
        self.position = bit_offset;
    }

    #[inline(always)]
    fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_packed_msb_first() {
        let mut writer = BitWriter::new();
        writer.put_bit(true);
        writer.put_bits_repeat(false, 2);
        writer.put_bit(true);
        assert_eq!(writer.bits_len(), 4);
        assert_eq!(writer.into_bytes(), vec![0b1001_0000]);
    }

    #[test]
    fn repeat_with_reset_clears_the_counter() {
        let mut writer = BitWriter::new();
        let mut pending = 3;
        writer.put_bit(false);
        writer.put_bits_repeat_with_reset(true, &mut pending);
        assert_eq!(pending, 0);
        assert_eq!(writer.into_bytes(), vec![0b0111_0000]);
    }

    #[test]
    fn unaligned_bytes_are_written_bit_by_bit() {
        let mut writer = BitWriter::new();
        writer.put_bit(true);
        writer.put_byte(0xFF);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0b1000_0000]);
    }

    #[test]
    fn reserved_u64_can_be_filled_later() {
        let mut writer = BitWriter::new();
        writer.put_bit(true);
        let offset = writer.reserve_u64();
        writer.put_byte(0xAB);
        writer.write_u64_at(offset, 0x0102_0304_0506_0708);

        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert!(reader.take_bit());
        assert_eq!(reader.take_u64(), 0x0102_0304_0506_0708);
        assert_eq!(reader.take_byte(), 0xAB);
    }

    #[test]
    fn reader_returns_zeros_past_the_end() {
        let bytes = [0b1000_0001];
        let mut reader = BitReader::new(&bytes);
        reader.seek(7);
        assert!(reader.take_bit());
        assert!(!reader.take_bit());
        assert!(!reader.take_bit());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 10);
    }
}
