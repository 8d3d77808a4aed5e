use proptest::prelude::*;

use civic_types::decimal::{decimal_places, mul_int, mul_trunc, quo_int_trunc, scale_to_integer};
use civic_types::{Decimal, MemberAddress, ProposalId};

proptest! {
    /// Truncating division never exceeds the exact quotient and is within one ulp of it.
    #[test]
    fn quotient_is_truncated_exact(num in 0u64..1_000_000, den in 1u64..10_000) {
        let q = quo_int_trunc(Decimal::from(num), den).unwrap();
        let back = mul_int(q, den).unwrap();
        prop_assert!(back <= Decimal::from(num));
        let ulp = Decimal::new(1, 18);
        prop_assert!(Decimal::from(num) - back < ulp * Decimal::from(den));
    }

    /// Multiplying by one is the identity for values at working precision.
    #[test]
    fn product_with_one_is_identity(mantissa in 0i64..1_000_000_000, scale in 0u32..10) {
        let value = Decimal::new(mantissa, scale);
        prop_assert_eq!(mul_trunc(value, Decimal::ONE).unwrap(), value);
    }

    /// Scaling by the maximum decimal places keeps the ratio between two values.
    #[test]
    fn scaling_preserves_proportions(a in 0i64..1_000_000, b in 1i64..1_000_000, sa in 0u32..8, sb in 0u32..8) {
        let x = Decimal::new(a, sa);
        let y = Decimal::new(b, sb);
        let places = decimal_places(x).max(decimal_places(y));
        let xi = scale_to_integer(x, places).unwrap();
        let yi = scale_to_integer(y, places).unwrap();
        // x / y == xi / yi  <=>  x * yi == y * xi
        prop_assert_eq!(x * Decimal::from(yi), y * Decimal::from(xi));
    }

    /// Address ordering agrees with string ordering.
    #[test]
    fn address_ordering(a in "[a-z0-9]{1,16}", b in "[a-z0-9]{1,16}") {
        let x = MemberAddress::new(format!("civ_{a}"));
        let y = MemberAddress::new(format!("civ_{b}"));
        prop_assert_eq!(x.cmp(&y), x.as_str().cmp(y.as_str()));
    }

    /// Proposal id bytes sort in numeric order.
    #[test]
    fn proposal_id_bytes_sort_numerically(a in any::<u64>(), b in any::<u64>()) {
        let (x, y) = (ProposalId::new(a), ProposalId::new(b));
        prop_assert_eq!(x.to_be_bytes().cmp(&y.to_be_bytes()), a.cmp(&b));
    }

    /// Address bincode roundtrip keeps the string form.
    #[test]
    fn address_bincode_roundtrip(body in "[a-z0-9]{1,32}") {
        let addr = MemberAddress::new(format!("civ_{body}"));
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: MemberAddress = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, addr);
    }
}
