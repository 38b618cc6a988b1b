//! Structural type hash of uniform blocks.

use crc::{Crc, CRC_32_ISO_HDLC};
use shdc_reflect::UniformBlock;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CRC32 over the concatenated `<type><count>` of every member, in order.
///
/// Member names don't take part, so two blocks with the same type/count
/// sequence hash identically.
pub fn type_hash(block: &UniformBlock) -> u32 {
    let mut signature = String::new();
    for member in &block.members {
        signature.push_str(&member.ty);
        signature.push_str(&member.num.to_string());
    }
    CRC32.checksum(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use shdc_reflect::UniformMember;

    use super::*;

    fn block(members: &[(&str, &str, u32)]) -> UniformBlock {
        UniformBlock {
            type_name: String::from("params"),
            name: String::from("params"),
            slot: 0,
            size: 0,
            members: members
                .iter()
                .map(|&(name, ty, num)| UniformMember::new(name, ty, num, 0))
                .collect(),
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(type_hash(&block(&[])), 0);
        assert_eq!(type_hash(&block(&[("mvp", "mat4", 1)])), 0x9d16_e7c6);
        assert_eq!(
            type_hash(&block(&[("mvp", "mat4", 1), ("tint", "vec4", 1)])),
            0xed94_2c98
        );
        assert_eq!(
            type_hash(&block(&[("alpha", "float", 1), ("light", "vec3", 1)])),
            0xc5e9_c524
        );
    }

    #[test]
    fn test_names_do_not_matter() {
        let a = block(&[("mvp", "mat4", 1), ("tint", "vec4", 1)]);
        let b = block(&[("model", "mat4", 1), ("color", "vec4", 1)]);
        assert_eq!(type_hash(&a), type_hash(&b));
    }

    #[test]
    fn test_order_type_and_count_matter() {
        let base = type_hash(&block(&[("m", "mat4", 1), ("v", "vec4", 1)]));
        let swapped = type_hash(&block(&[("v", "vec4", 1), ("m", "mat4", 1)]));
        let retyped = type_hash(&block(&[("m", "mat4", 1), ("v", "vec3", 1)]));
        let recounted = type_hash(&block(&[("m", "mat4", 2), ("v", "vec4", 1)]));
        assert_eq!(swapped, 0x9873_bb88);
        assert_ne!(base, swapped);
        assert_ne!(base, retyped);
        assert_ne!(base, recounted);
    }
}
