//! Flag group analysis.
//!
//! Every `#` parameter opens a group; every conditional joins the group of
//! the flag word it names. Within one bit, payload-carrying members and
//! presence literals own the bit. A `Bool` on a bit that already has an
//! owner becomes a [`FlagBinding::SharedBool`] and never drives the bit.
//! When only `Bool`s use a bit, the first one owns it.

use std::collections::BTreeSet;

use crate::model::{FieldSpec, FlagBinding, FlagGroup, FlagGroupId, FlagMember, TypeRef};

pub fn flag_groups(fields: &[FieldSpec]) -> Vec<FlagGroup> {
    let mut groups: Vec<FlagGroup> = fields
        .iter()
        .filter(|f| f.ty.is_flag_word())
        .enumerate()
        .map(|(i, f)| FlagGroup {
            id: FlagGroupId(i as u8),
            field: f.name.clone(),
            members: Vec::new(),
        })
        .collect();

    for field in fields {
        let TypeRef::Conditional { group, bit, real } = &field.ty else {
            continue;
        };
        let Some(target) = groups.get_mut(group.0 as usize) else {
            continue;
        };
        let binding = if real.is_presence_literal() {
            FlagBinding::Presence
        } else {
            FlagBinding::Optional
        };
        target.members.push(FlagMember {
            field: field.name.clone(),
            bit: *bit,
            binding,
            shared: false,
        });
    }

    for group in &mut groups {
        assign_shared(group, fields);
    }

    groups
}

fn is_bool(fields: &[FieldSpec], member: &FlagMember) -> bool {
    fields
        .iter()
        .find(|f| f.name == member.field)
        .is_some_and(|f| matches!(f.ty.value_type(), TypeRef::Raw(name) if name == "Bool"))
}

fn assign_shared(group: &mut FlagGroup, fields: &[FieldSpec]) {
    let bools: Vec<bool> = group.members.iter().map(|m| is_bool(fields, m)).collect();
    let bits: BTreeSet<u8> = group.members.iter().map(|m| m.bit).collect();

    for bit in bits {
        let on_bit: Vec<usize> = (0..group.members.len())
            .filter(|&i| group.members[i].bit == bit)
            .collect();
        let shared = on_bit.len() > 1;
        let mut owned = on_bit.iter().any(|&i| !bools[i]);

        for i in on_bit {
            let member = &mut group.members[i];
            member.shared = shared;
            if bools[i] {
                if owned {
                    member.binding = FlagBinding::SharedBool;
                } else {
                    owned = true;
                }
            }
        }
    }
}
