//! Quota and flow accounting
//!
//! Each rate limit tracks the inflow and outflow of one denom over one channel
//! during the current window. A packet is admitted when the resulting *net*
//! flow in its direction stays within `channel_value * max_percent / 100`.
//!
//! All arithmetic is integer; the threshold is floored and the comparison is
//! strict, so a transfer landing exactly on the threshold is admitted.
//! Intermediate sums are widened to `Uint256` so the check itself cannot
//! overflow.

use cosmwasm_std::{Storage, StdResult, Uint128, Uint256};

use common::PacketDirection;

use crate::error::ContractError;
use crate::state::{Flow, FlowSide, Path, Quota, RateLimit, PERCENT_DENOMINATOR, RATE_LIMITS};

/// Maximum net flow allowed for a channel value and percentage (floored).
///
/// Percents above 100 are rejected at configuration time; a product that no
/// longer fits in `Uint128` is reported rather than clamped.
pub fn threshold(
    channel_value: Uint128,
    max_percent: Uint128,
) -> Result<Uint128, ContractError> {
    let scaled = channel_value.full_mul(max_percent) / Uint256::from(PERCENT_DENOMINATOR);
    Ok(Uint128::try_from(scaled)?)
}

impl Flow {
    /// Apply `amount` in `direction` if the quota allows it.
    ///
    /// On error the flow is left untouched.
    pub fn add(
        &mut self,
        direction: PacketDirection,
        quota: &Quota,
        amount: Uint128,
    ) -> Result<(), ContractError> {
        let side = FlowSide::from(direction);
        let (current, opposite) = match side {
            FlowSide::Outflow => (self.outflow, self.inflow),
            FlowSide::Inflow => (self.inflow, self.outflow),
        };
        let threshold = threshold(self.channel_value, quota.max_percent(direction))?;

        // net = current + amount - opposite, compared without going negative
        let prospective = Uint256::from(current) + Uint256::from(amount);
        let allowed = Uint256::from(threshold) + Uint256::from(opposite);
        if prospective > allowed {
            return Err(ContractError::QuotaExceeded {
                side,
                attempted: amount,
                current: self.net(side),
                threshold,
            });
        }

        let updated = current.checked_add(amount)?;
        match side {
            FlowSide::Outflow => self.outflow = updated,
            FlowSide::Inflow => self.inflow = updated,
        }
        Ok(())
    }

    /// Undo a previously recorded `amount`, saturating at zero.
    pub fn undo(&mut self, direction: PacketDirection, amount: Uint128) {
        match direction {
            PacketDirection::Send => self.outflow = self.outflow.saturating_sub(amount),
            PacketDirection::Recv => self.inflow = self.inflow.saturating_sub(amount),
        }
    }

    /// Net flow on `side` (zero when the opposite side is larger).
    pub fn net(&self, side: FlowSide) -> Uint128 {
        match side {
            FlowSide::Inflow => self.inflow.saturating_sub(self.outflow),
            FlowSide::Outflow => self.outflow.saturating_sub(self.inflow),
        }
    }
}

/// Check a transfer against the rate limit for `path` and record it.
///
/// Returns `Ok(true)` when the flow was recorded and `Ok(false)` when no rate
/// limit exists for the path (unrestricted). A rejected transfer writes
/// nothing.
pub fn check_and_record(
    storage: &mut dyn Storage,
    direction: PacketDirection,
    path: &Path,
    amount: Uint128,
) -> Result<bool, ContractError> {
    let Some(mut rate_limit) = RATE_LIMITS.may_load(storage, path.key())? else {
        return Ok(false);
    };

    rate_limit.flow.add(direction, &rate_limit.quota, amount)?;
    RATE_LIMITS.save(storage, path.key(), &rate_limit)?;

    Ok(true)
}

/// Reverse a transfer that never happened (failed ack or timeout).
///
/// Missing rate limits are ignored. Callers are responsible for invoking this
/// at most once per packet.
pub fn revert_flow(
    storage: &mut dyn Storage,
    direction: PacketDirection,
    path: &Path,
    amount: Uint128,
) -> StdResult<()> {
    let Some(mut rate_limit) = RATE_LIMITS.may_load(storage, path.key())? else {
        return Ok(());
    };

    rate_limit.flow.undo(direction, amount);
    RATE_LIMITS.save(storage, path.key(), &rate_limit)
}

/// Start a new window: zero both counters and take a fresh channel value.
///
/// A zero snapshot is refused the same way it is at creation.
pub fn reset_flow(
    storage: &mut dyn Storage,
    path: &Path,
    channel_value: Uint128,
) -> Result<RateLimit, ContractError> {
    if channel_value.is_zero() {
        return Err(ContractError::ZeroChannelValue {
            denom: path.denom.clone(),
        });
    }

    let mut rate_limit = RATE_LIMITS
        .may_load(storage, path.key())?
        .ok_or_else(|| ContractError::RateLimitNotFound {
            denom: path.denom.clone(),
            channel_id: path.channel_id.clone(),
        })?;

    rate_limit.flow = Flow::new(channel_value);
    RATE_LIMITS.save(storage, path.key(), &rate_limit)?;

    Ok(rate_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    fn path() -> Path {
        Path::new("ustrd", "channel-0")
    }

    fn quota(percent: u128) -> Quota {
        Quota {
            max_percent_send: Uint128::new(percent),
            max_percent_recv: Uint128::new(percent),
            duration_hours: 24,
        }
    }

    /// channel value 100, 10% both ways
    fn store_rate_limit(storage: &mut dyn Storage, inflow: u128, outflow: u128) {
        let rate_limit = RateLimit {
            path: path(),
            quota: quota(10),
            flow: Flow {
                inflow: Uint128::new(inflow),
                outflow: Uint128::new(outflow),
                channel_value: Uint128::new(100),
            },
        };
        RATE_LIMITS.save(storage, path().key(), &rate_limit).unwrap();
    }

    fn load_flow(storage: &dyn Storage) -> Flow {
        RATE_LIMITS.load(storage, path().key()).unwrap().flow
    }

    #[test]
    fn test_threshold_floors() {
        let t = |value: u128, percent: u128| threshold(Uint128::new(value), Uint128::new(percent));
        assert_eq!(t(100, 10).unwrap(), Uint128::new(10));
        assert_eq!(t(99, 10).unwrap(), Uint128::new(9));
        assert_eq!(t(5, 100).unwrap(), Uint128::new(5));
        assert_eq!(t(u128::MAX, 100).unwrap(), Uint128::MAX);
        assert_eq!(t(1000, 0).unwrap(), Uint128::zero());
        assert_eq!(t(0, 10).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_threshold_out_of_range_is_an_error() {
        // 200% of the largest value does not fit; never clamped
        let err = threshold(Uint128::MAX, Uint128::new(200)).unwrap_err();
        assert!(matches!(err, ContractError::ConversionOverflow(_)));
    }

    #[test]
    fn test_no_rate_limit_is_unrestricted() {
        let mut storage = MockStorage::new();
        let recorded =
            check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(1_000_000))
                .unwrap();
        assert!(!recorded);
        assert!(RATE_LIMITS.may_load(&storage, path().key()).unwrap().is_none());
    }

    #[test]
    fn test_send_exceeds_outflow_quota() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 0, 9);

        let err = check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(5))
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::QuotaExceeded {
                side: FlowSide::Outflow,
                attempted: Uint128::new(5),
                current: Uint128::new(9),
                threshold: Uint128::new(10),
            }
        );
        assert!(err.to_string().contains("Outflow exceeds quota"));
        assert_eq!(load_flow(&storage).outflow, Uint128::new(9));
    }

    #[test]
    fn test_recv_exceeds_inflow_quota() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 9, 0);

        let err = check_and_record(&mut storage, PacketDirection::Recv, &path(), Uint128::new(5))
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::QuotaExceeded {
                side: FlowSide::Inflow,
                ..
            }
        ));
        assert!(err.to_string().contains("Inflow exceeds quota"));
        assert_eq!(load_flow(&storage).inflow, Uint128::new(9));
    }

    #[test]
    fn test_rejection_leaves_flow_untouched() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 3, 9);
        let before = load_flow(&storage);

        check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(50))
            .unwrap_err();
        assert_eq!(load_flow(&storage), before);
    }

    #[test]
    fn test_admitted_flow_is_recorded() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 0, 0);

        assert!(
            check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(4)).unwrap()
        );
        assert!(
            check_and_record(&mut storage, PacketDirection::Recv, &path(), Uint128::new(2)).unwrap()
        );
        let flow = load_flow(&storage);
        assert_eq!(flow.outflow, Uint128::new(4));
        assert_eq!(flow.inflow, Uint128::new(2));
        assert_eq!(flow.channel_value, Uint128::new(100));
    }

    #[test]
    fn test_boundary_exact_threshold_admitted() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 0, 9);

        check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(1)).unwrap();
        assert_eq!(load_flow(&storage).outflow, Uint128::new(10));

        // one more unit goes over
        check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(1))
            .unwrap_err();
    }

    #[test]
    fn test_opposite_flow_offsets_net() {
        let mut storage = MockStorage::new();
        // inflow of 6 lets outflow reach 16 before the net exceeds 10
        store_rate_limit(&mut storage, 6, 9);

        check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(7)).unwrap();
        assert_eq!(load_flow(&storage).outflow, Uint128::new(16));

        let err = check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::QuotaExceeded { current, .. } if current == Uint128::new(10)
        ));
    }

    #[test]
    fn test_zero_channel_value_rejects_everything() {
        let mut storage = MockStorage::new();
        let rate_limit = RateLimit {
            path: path(),
            quota: quota(10),
            flow: Flow::new(Uint128::zero()),
        };
        RATE_LIMITS.save(&mut storage, path().key(), &rate_limit).unwrap();

        let err = check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::QuotaExceeded {
                side: FlowSide::Outflow,
                attempted: Uint128::new(1),
                current: Uint128::zero(),
                threshold: Uint128::zero(),
            }
        );
        check_and_record(&mut storage, PacketDirection::Recv, &path(), Uint128::new(1))
            .unwrap_err();
        assert_eq!(load_flow(&storage), Flow::new(Uint128::zero()));

        // a zero-amount transfer moves nothing and is admitted
        check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::zero()).unwrap();
    }

    #[test]
    fn test_reset_refuses_zero_channel_value() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 0, 9);

        let err = reset_flow(&mut storage, &path(), Uint128::zero()).unwrap_err();
        assert_eq!(
            err,
            ContractError::ZeroChannelValue {
                denom: "ustrd".to_string()
            }
        );
        // record untouched, quota still enforced
        assert_eq!(load_flow(&storage).outflow, Uint128::new(9));
        check_and_record(
            &mut storage,
            PacketDirection::Send,
            &path(),
            Uint128::new(1_000_000_000),
        )
        .unwrap_err();
    }

    #[test]
    fn test_counter_overflow_is_an_error() {
        let mut storage = MockStorage::new();
        let rate_limit = RateLimit {
            path: path(),
            quota: quota(100),
            // a large inflow keeps the net within quota so the counter itself overflows
            flow: Flow {
                inflow: Uint128::MAX,
                outflow: Uint128::MAX - Uint128::new(1),
                channel_value: Uint128::MAX,
            },
        };
        RATE_LIMITS.save(&mut storage, path().key(), &rate_limit).unwrap();

        let err = check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(5))
            .unwrap_err();
        assert!(matches!(err, ContractError::Overflow(_)));
        assert_eq!(load_flow(&storage).outflow, Uint128::MAX - Uint128::new(1));
    }

    #[test]
    fn test_outflow_never_decreases_across_checks() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 0, 0);

        // (amount, admitted, outflow afterwards) against a threshold of 10
        let steps = [
            (3u128, true, 3u128),
            (20, false, 3),
            (4, true, 7),
            (1, true, 8),
            (7, false, 8),
            (2, true, 10),
            (1, false, 10),
        ];

        let mut last = Uint128::zero();
        for (amount, admitted, expected_outflow) in steps {
            let res =
                check_and_record(&mut storage, PacketDirection::Send, &path(), Uint128::new(amount));
            match res {
                Ok(recorded) => {
                    assert!(admitted, "amount {} should have been rejected", amount);
                    assert!(recorded);
                }
                Err(err) => {
                    assert!(!admitted, "amount {} should have been admitted", amount);
                    assert!(matches!(
                        err,
                        ContractError::QuotaExceeded {
                            side: FlowSide::Outflow,
                            ..
                        }
                    ));
                }
            }
            let outflow = load_flow(&storage).outflow;
            assert_eq!(outflow, Uint128::new(expected_outflow), "after amount {}", amount);
            assert!(outflow >= last);
            last = outflow;
        }
    }

    #[test]
    fn test_revert_saturates_at_zero() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 2, 5);

        revert_flow(&mut storage, PacketDirection::Send, &path(), Uint128::new(3)).unwrap();
        assert_eq!(load_flow(&storage).outflow, Uint128::new(2));

        revert_flow(&mut storage, PacketDirection::Send, &path(), Uint128::new(10)).unwrap();
        revert_flow(&mut storage, PacketDirection::Recv, &path(), Uint128::new(10)).unwrap();
        let flow = load_flow(&storage);
        assert_eq!(flow.outflow, Uint128::zero());
        assert_eq!(flow.inflow, Uint128::zero());
    }

    #[test]
    fn test_revert_without_rate_limit_is_noop() {
        let mut storage = MockStorage::new();
        revert_flow(&mut storage, PacketDirection::Recv, &path(), Uint128::new(3)).unwrap();
        assert!(RATE_LIMITS.may_load(&storage, path().key()).unwrap().is_none());
    }

    #[test]
    fn test_reset_zeroes_flow_and_keeps_quota() {
        let mut storage = MockStorage::new();
        store_rate_limit(&mut storage, 7, 9);

        let rate_limit = reset_flow(&mut storage, &path(), Uint128::new(250)).unwrap();
        assert_eq!(rate_limit.flow, Flow::new(Uint128::new(250)));
        assert_eq!(rate_limit.quota, quota(10));
        assert_eq!(rate_limit.path, path());
        assert_eq!(load_flow(&storage), Flow::new(Uint128::new(250)));
    }

    #[test]
    fn test_reset_missing_rate_limit() {
        let mut storage = MockStorage::new();
        let err = reset_flow(&mut storage, &path(), Uint128::new(1)).unwrap_err();
        assert_eq!(
            err,
            ContractError::RateLimitNotFound {
                denom: "ustrd".to_string(),
                channel_id: "channel-0".to_string(),
            }
        );
    }
}
