use std::fmt;

/// Growable bit sequence stored least-significant-bit first within each byte.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << bit_offset;
        }

        self.bit_count += 1;
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitVec) {
        if self.bit_count % 8 == 0 {
            // byte aligned, copy whole bytes
            self.bits.extend_from_slice(&other.bits);
            self.bit_count += other.bit_count;
            return;
        }
        for bit in other.iter() {
            self.push_bit(bit);
        }
    }

    pub fn pop(&mut self) -> Option<bool> {
        if self.bit_count == 0 {
            return None;
        }
        self.bit_count -= 1;
        let byte_index = self.bit_count / 8;
        let mask = 1 << (self.bit_count % 8);
        let bit = self.bits[byte_index] & mask != 0;
        self.bits[byte_index] &= !mask;
        if self.bit_count % 8 == 0 {
            self.bits.pop();
        }
        Some(bit)
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some((self.bits[index / 8] >> (index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| (self.bits[i / 8] >> (i % 8)) & 1 == 1)
    }

    pub fn starts_with(&self, prefix: &BitVec) -> bool {
        prefix.len() <= self.len() && prefix.iter().zip(self.iter()).all(|(a, b)| a == b)
    }

    /// Data bytes followed by one marker byte holding the number of valid
    /// bits in the last data byte (1-8). An empty sequence packs to `[8]`.
    pub fn pack(&self) -> Vec<u8> {
        let mut packed = Vec::with_capacity(self.bits.len() + 1);
        packed.extend_from_slice(&self.bits);
        let tail = self.bit_count % 8;
        packed.push(if tail == 0 { 8 } else { tail as u8 });
        packed
    }

    /// Inverse of [`BitVec::pack`]. Never fails: any byte string expands to
    /// some bit sequence, so corruption is not detected here. A marker above 8
    /// counts as 8.
    pub fn unpack(packed: &[u8]) -> BitVec {
        let Some((&marker, data)) = packed.split_last() else {
            return BitVec::new();
        };
        if data.is_empty() {
            return BitVec::new();
        }

        let valid = usize::from(marker.min(8));
        let bit_count = (data.len() - 1) * 8 + valid;
        let mut bits = data.to_vec();
        if let Some(last) = bits.last_mut() {
            // clear bits past the marker so the vector stays canonical
            *last &= ((1u16 << valid) - 1) as u8;
        }
        if valid == 0 {
            bits.pop();
        }
        BitVec { bits, bit_count }
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bit_vec = BitVec::new();
        for bit in iter {
            bit_vec.push_bit(bit);
        }
        bit_vec
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bits(pattern: &str) -> BitVec {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn packs_lsb_first() {
        let packed = bits("0001").pack();
        assert_eq!(packed, vec![0x08, 4]);

        let packed = bits("10000000").pack();
        assert_eq!(packed, vec![0x01, 8]);

        let packed = bits("111111111").pack();
        assert_eq!(packed, vec![0xff, 0x01, 1]);
    }

    #[test]
    fn empty_packs_to_marker_only() {
        assert_eq!(BitVec::new().pack(), vec![8]);
        assert!(BitVec::unpack(&[8]).is_empty());
        assert!(BitVec::unpack(&[]).is_empty());
    }

    #[test]
    fn pack_round_trip_lengths() {
        for len in [0, 1, 7, 8, 9, 15, 16, 17] {
            let original: BitVec = (0..len).map(|i| (i * 7 + 3) % 5 < 2).collect();
            let unpacked = BitVec::unpack(&original.pack());
            assert_eq!(unpacked, original, "length {}", len);
            assert_eq!(unpacked.len(), len);
        }
    }

    #[test]
    fn unpack_never_fails() {
        // marker larger than 8 reads the whole last byte
        assert_eq!(BitVec::unpack(&[0xaa, 0x0f, 200]).len(), 16);
        // zero marker contributes nothing from the last data byte
        let zero = BitVec::unpack(&[0xff, 0xff, 0]);
        assert_eq!(zero.len(), 8);
        assert_eq!(zero, bits("11111111"));
        // a lone data byte with no marker is taken as the marker
        assert!(BitVec::unpack(&[3]).is_empty());
    }

    #[test]
    fn unpack_ignores_padding_bits() {
        let unpacked = BitVec::unpack(&[0xf8, 3]);
        assert_eq!(unpacked, bits("000"));
    }

    #[test]
    fn push_pop_and_prefix() {
        let mut v = bits("101100101");
        assert_eq!(v.to_string(), "101100101");
        assert_eq!(v.pop(), Some(true));
        assert_eq!(v.len(), 8);
        assert!(v.starts_with(&bits("1011")));
        assert!(!v.starts_with(&bits("111")));
        assert_eq!(v.get(0), Some(true));
        assert_eq!(v.get(1), Some(false));
        assert_eq!(v.get(8), None);
    }

    #[test]
    fn extend_unaligned() {
        let mut v = bits("101");
        v.extend_from(&bits("0011"));
        assert_eq!(v, bits("1010011"));

        let mut aligned = bits("11110000");
        aligned.extend_from(&bits("01"));
        assert_eq!(aligned, bits("1111000001"));
    }
}
