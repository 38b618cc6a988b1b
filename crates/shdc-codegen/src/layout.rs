//! Uniform block struct layout.
//!
//! Members are placed at the offsets the compiler reported; gaps become
//! explicit byte padding so that a C struct built from the layout has the
//! same memory image as the shader-side block.

use shdc_reflect::{Packing, ShdcError, ShdcResult, UniformBlock, UniformMember, ValueType};

/// One field of a generated block struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Padding {
        offset: u32,
        size: u32,
    },
    Member {
        member: &'a UniformMember,
        ty: ValueType,
        offset: u32,
        size: u32,
    },
}

impl Field<'_> {
    pub fn offset(&self) -> u32 {
        match *self {
            Field::Padding { offset, .. } | Field::Member { offset, .. } => offset,
        }
    }

    /// Bytes the field occupies.
    pub fn size(&self) -> u32 {
        match *self {
            Field::Padding { size, .. } | Field::Member { size, .. } => size,
        }
    }
}

/// Fields of a uniform block, in memory order, plus its total size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout<'a> {
    pub fields: Vec<Field<'a>>,
    pub size: u32,
}

impl<'a> BlockLayout<'a> {
    /// Lay out `block` for a variant using `packing`.
    ///
    /// The total size is the larger of the end of the last member and the
    /// reported block size, rounded up to 16 for std140 packing. Any space
    /// past the last member is filled with trailing padding.
    ///
    /// # Errors
    ///
    /// Returns a reflection error for a member of unknown type, one that
    /// starts before the previous member ends, or a block whose size does
    /// not fit in 32 bits.
    pub fn new(block: &'a UniformBlock, packing: Packing) -> ShdcResult<Self> {
        let mut fields = Vec::with_capacity(block.members.len());
        let mut cursor: u32 = 0;

        for member in &block.members {
            let ty = member.value_type().ok_or_else(|| {
                ShdcError::reflection(format!(
                    "uniform block '{}' member '{}' has unknown type '{}'",
                    block.type_name, member.name, member.ty
                ))
            })?;
            if member.offset < cursor {
                return Err(ShdcError::reflection(format!(
                    "uniform block '{}' member '{}' at offset {} overlaps the previous member ending at {}",
                    block.type_name, member.name, member.offset, cursor
                )));
            }
            if member.offset > cursor {
                fields.push(Field::Padding {
                    offset: cursor,
                    size: member.offset - cursor,
                });
                cursor = member.offset;
            }
            let size = ty
                .size()
                .checked_mul(member.num)
                .and_then(|size| cursor.checked_add(size).map(|end| (size, end)));
            let (size, end) = size.ok_or_else(|| {
                ShdcError::reflection(format!(
                    "uniform block '{}' member '{}' ({} x {}) at offset {} overflows the block size",
                    block.type_name, member.name, member.ty, member.num, cursor
                ))
            })?;
            fields.push(Field::Member {
                member,
                ty,
                offset: cursor,
                size,
            });
            cursor = end;
        }

        let mut size = cursor.max(block.size);
        if packing == Packing::Std140 {
            size = round_up(size, 16).ok_or_else(|| {
                ShdcError::reflection(format!(
                    "uniform block '{}' size {} overflows when rounded up to 16",
                    block.type_name, size
                ))
            })?;
        }
        if size > cursor {
            fields.push(Field::Padding {
                offset: cursor,
                size: size - cursor,
            });
        }
        Ok(BlockLayout { fields, size })
    }

    pub fn members(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields
            .iter()
            .filter(|f| matches!(f, Field::Member { .. }))
    }
}

/// Round `value` up to a multiple of `align`, which must be a power of two.
///
/// Returns `None` when the result does not fit in a `u32`.
pub fn round_up(value: u32, align: u32) -> Option<u32> {
    value.checked_add(align - 1).map(|v| v & !(align - 1))
}

#[cfg(test)]
mod tests {
    use shdc_reflect::ErrorKind;

    use super::*;

    fn block(size: u32, members: &[(&str, &str, u32, u32)]) -> UniformBlock {
        UniformBlock {
            type_name: String::from("params"),
            name: String::from("params"),
            slot: 0,
            size,
            members: members
                .iter()
                .map(|&(name, ty, num, offset)| UniformMember::new(name, ty, num, offset))
                .collect(),
        }
    }

    fn padding(layout: &BlockLayout) -> Vec<(u32, u32)> {
        layout
            .fields
            .iter()
            .filter_map(|f| match *f {
                Field::Padding { offset, size } => Some((offset, size)),
                Field::Member { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 16), Some(0));
        assert_eq!(round_up(1, 16), Some(16));
        assert_eq!(round_up(16, 16), Some(16));
        assert_eq!(round_up(68, 16), Some(80));
        assert_eq!(round_up(u32::MAX - 15, 16), Some(u32::MAX - 15));
        assert_eq!(round_up(u32::MAX - 14, 16), None);
    }

    #[test]
    fn test_tightly_packed() {
        let b = block(80, &[("mvp", "mat4", 1, 0), ("tint", "vec4", 1, 64)]);
        let layout = BlockLayout::new(&b, Packing::Std140).unwrap();
        assert_eq!(layout.size, 80);
        assert!(padding(&layout).is_empty());
        assert_eq!(layout.members().count(), 2);
    }

    #[test]
    fn test_gap_becomes_padding() {
        // vec3 followed by a vec4 aligned to 16
        let b = block(32, &[("light", "vec3", 1, 0), ("color", "vec4", 1, 16)]);
        let layout = BlockLayout::new(&b, Packing::Native).unwrap();
        assert_eq!(padding(&layout), [(12, 4)]);
        assert_eq!(layout.fields[2].offset(), 16);
        assert_eq!(layout.size, 32);
    }

    #[test]
    fn test_std140_rounds_size() {
        let b = block(68, &[("mvp", "mat4", 1, 0), ("alpha", "float", 1, 64)]);
        let std140 = BlockLayout::new(&b, Packing::Std140).unwrap();
        assert_eq!(std140.size, 80);
        assert_eq!(padding(&std140), [(68, 12)]);

        let native = BlockLayout::new(&b, Packing::Native).unwrap();
        assert_eq!(native.size, 68);
        assert!(padding(&native).is_empty());
    }

    #[test]
    fn test_reported_size_beyond_members() {
        let b = block(48, &[("alpha", "float", 1, 0)]);
        let layout = BlockLayout::new(&b, Packing::Native).unwrap();
        assert_eq!(layout.size, 48);
        assert_eq!(padding(&layout), [(4, 44)]);
    }

    #[test]
    fn test_fields_fill_block_exactly() {
        let members = [
            ("a", "float", 1, 0),
            ("b", "vec2", 1, 8),
            ("c", "vec3", 1, 16),
            ("d", "vec4", 3, 32),
            ("e", "mat2", 1, 96),
            ("f", "float", 1, 116),
        ];
        for packing in [Packing::Native, Packing::Std140] {
            let b = block(0, &members);
            let layout = BlockLayout::new(&b, packing).unwrap();
            let mut expected = 0;
            for field in &layout.fields {
                assert_eq!(field.offset(), expected);
                expected += field.size();
            }
            assert_eq!(expected, layout.size);
            if packing == Packing::Std140 {
                assert_eq!(layout.size % 16, 0);
            }
        }
    }

    #[test]
    fn test_overlap_is_error() {
        let b = block(0, &[("m", "mat4", 1, 0), ("v", "vec4", 1, 32)]);
        let err = BlockLayout::new(&b, Packing::Std140).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reflection);
        assert!(err.message.contains("'v'"));
    }

    #[test]
    fn test_huge_array_is_error() {
        let b = block(0, &[("bones", "mat4", 67_108_865, 0)]);
        let err = BlockLayout::new(&b, Packing::Std140).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reflection);
        assert!(err.message.contains("'bones'"));

        // fits on its own, but not after the member before it
        let b = block(0, &[("a", "vec4", 1, 0), ("bones", "mat4", 67_108_863, 64)]);
        assert_eq!(
            BlockLayout::new(&b, Packing::Native).unwrap_err().kind,
            ErrorKind::Reflection
        );
    }

    #[test]
    fn test_std140_rounding_overflow_is_error() {
        let b = block(u32::MAX - 3, &[("alpha", "float", 1, 0)]);
        let err = BlockLayout::new(&b, Packing::Std140).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reflection);
        assert!(BlockLayout::new(&b, Packing::Native).is_ok());
    }

    #[test]
    fn test_unknown_type_is_error() {
        let b = block(0, &[("i", "ivec4", 1, 0)]);
        assert_eq!(
            BlockLayout::new(&b, Packing::Native).unwrap_err().kind,
            ErrorKind::Reflection
        );
    }
}
