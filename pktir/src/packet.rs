//! Selection of packet functions among the declarations of a compilation unit.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::FunctionDecl;

/// Decides which top-level functions hold packet-processing logic.
pub trait PacketFunctionFilter {
    fn is_packet_function(&self, function: &FunctionDecl) -> bool;
}

impl<F> PacketFunctionFilter for F
where
    F: Fn(&FunctionDecl) -> bool,
{
    fn is_packet_function(&self, function: &FunctionDecl) -> bool {
        self(function)
    }
}

/// Signature-based filter: a packet function returns `void` and takes exactly one
/// parameter of the packet type.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PacketSignature {
    pub packet_type: String,
}

impl PacketSignature {
    pub const DEFAULT_PACKET_TYPE: &'static str = "struct Packet";

    pub fn new(packet_type: impl Into<String>) -> Self {
        Self {
            packet_type: packet_type.into(),
        }
    }
}

impl Default for PacketSignature {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PACKET_TYPE)
    }
}

impl PacketFunctionFilter for PacketSignature {
    fn is_packet_function(&self, function: &FunctionDecl) -> bool {
        function.return_type == "void"
            && matches!(function.params.as_slice(), [param] if param.ty == self.packet_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{TypedName, build::packet_function};

    #[test]
    fn default_signature_matches_packet_functions() {
        let filter = PacketSignature::default();
        assert!(filter.is_packet_function(&packet_function("func", vec![])));
    }

    #[test]
    fn signature_rejects_other_shapes() {
        let filter = PacketSignature::default();

        let mut returns_int = packet_function("func", vec![]);
        returns_int.return_type = "int".to_string();
        assert!(!filter.is_packet_function(&returns_int));

        let mut two_params = packet_function("func", vec![]);
        two_params.params.push(TypedName {
            name: "q".to_string(),
            ty: "struct Packet".to_string(),
        });
        assert!(!filter.is_packet_function(&two_params));

        let mut scalar_param = packet_function("func", vec![]);
        scalar_param.params[0].ty = "int".to_string();
        assert!(!filter.is_packet_function(&scalar_param));
    }

    #[test]
    fn closures_are_filters() {
        let by_name = |function: &FunctionDecl| function.name == "ingress";
        assert!(by_name.is_packet_function(&packet_function("ingress", vec![])));
        assert!(!by_name.is_packet_function(&packet_function("egress", vec![])));
    }
}
