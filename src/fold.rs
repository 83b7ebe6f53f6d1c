//! XOR-folding hashes used to squeeze addresses and long histories into
//! narrow table indexes and tags.

use bitvec::prelude::*;

/// Stride and offset used when folding address bits into a tag.
pub const PC_TAG_SPREAD: (usize, usize) = (7, 5);

/// Stride and offset used when folding history bits into a tag.
pub const HISTORY_TAG_SPREAD: (usize, usize) = (13, 3);

/// Number of address bits presented to the hash functions.
pub const PC_BITS: usize = u32::BITS as usize;

/// Fold [with XOR] some slice of bits into 'output_bits' bits.
///
/// The slice is cut into consecutive 'output_bits'-wide chunks starting at
/// bit 0, and the chunks are XOR'ed together. The last chunk may be short.
pub fn fold_index<T: BitStore>(bits: &BitSlice<T, Lsb0>, output_bits: usize)
    -> usize
{
    if output_bits == 0 || bits.is_empty() {
        return 0;
    }
    let output_mask = (1 << output_bits) - 1;
    let res = bits.chunks(output_bits).fold(0, |res, x| {
        res ^ x.load_le::<usize>()
    });
    res & output_mask
}

/// Fold some slice of bits into 'output_bits' bits by scattering each bit.
///
/// Bit 'i' of the input is XOR'ed into position
/// `(i * stride + offset) % output_bits` of the result. Different
/// (stride, offset) pairs for the address and the history keep tag
/// collisions from lining up with index collisions.
pub fn fold_tag<T: BitStore>(bits: &BitSlice<T, Lsb0>,
    output_bits: usize, stride: usize, offset: usize) -> usize
{
    if output_bits == 0 {
        return 0;
    }
    bits.iter_ones().fold(0, |res, i| {
        res ^ (1 << ((i * stride + offset) % output_bits))
    })
}

/// Fold a program counter value into an index.
pub fn fold_pc_index(pc: u32, output_bits: usize) -> usize {
    fold_index(pc.view_bits::<Lsb0>(), output_bits)
}

/// Fold a program counter value into a tag.
pub fn fold_pc_tag(pc: u32, output_bits: usize) -> usize {
    let (stride, offset) = PC_TAG_SPREAD;
    fold_tag(pc.view_bits::<Lsb0>(), output_bits, stride, offset)
}

/// Fold some history bits into a tag.
pub fn fold_history_tag<T: BitStore>(bits: &BitSlice<T, Lsb0>,
    output_bits: usize) -> usize
{
    let (stride, offset) = HISTORY_TAG_SPREAD;
    fold_tag(bits, output_bits, stride, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fold_xors_consecutive_chunks() {
        let v: u32 = 0b1010_0110_1100;
        // 4-bit chunks: 1100 ^ 0110 ^ 1010 = 0000
        assert_eq!(fold_index(v.view_bits::<Lsb0>(), 4), 0b0000);
        // 5-bit chunks: 01100 ^ 10011 ^ 00010 = 11101
        assert_eq!(fold_index(v.view_bits::<Lsb0>(), 5), 0b11101);
        assert_eq!(fold_pc_index(0xffff_ffff, 16), 0);
        assert_eq!(fold_pc_index(0x0001_0001, 16), 0);
        assert_eq!(fold_pc_index(0x0000_00ab, 16), 0xab);
    }

    #[test]
    fn index_fold_respects_slice_length() {
        let v: u64 = 0xff00;
        assert_eq!(fold_index(&v.view_bits::<Lsb0>()[..8], 4), 0);
        assert_eq!(fold_index(&v.view_bits::<Lsb0>()[..12], 4), 0b1111);
    }

    #[test]
    fn zero_output_width_folds_to_zero() {
        let v: u32 = 0xdead_beef;
        assert_eq!(fold_index(v.view_bits::<Lsb0>(), 0), 0);
        assert_eq!(fold_tag(v.view_bits::<Lsb0>(), 0, 7, 5), 0);
    }

    #[test]
    fn tag_fold_scatters_bits() {
        // Bit 0 lands at offset 5, bit 1 at (7 + 5) % 9 = 3.
        assert_eq!(fold_pc_tag(0b01, 9), 1 << 5);
        assert_eq!(fold_pc_tag(0b10, 9), 1 << 3);
        assert_eq!(fold_pc_tag(0b11, 9), (1 << 5) | (1 << 3));
        // History bit 0 lands at offset 3, bit 1 at (13 + 3) % 9 = 7.
        let h: u64 = 0b11;
        assert_eq!(fold_history_tag(h.view_bits::<Lsb0>(), 9),
            (1 << 3) | (1 << 7));
    }

    #[test]
    fn tag_fold_stays_within_output_width() {
        for pc in [0u32, 1, 0x1234_5678, u32::MAX] {
            assert!(fold_pc_tag(pc, 9) < (1 << 9));
            assert!(fold_pc_index(pc, 10) < (1 << 10));
        }
    }
}
