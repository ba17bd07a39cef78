//! Fixed scenarios from the ledger's inflation acceptance suite
//!
//! Twelve accounts `A0..A11`; total supply 10^11 whole units at 10^6 dust per
//! unit; 50 winners, 15 permil threshold, rate 190721 / 10^9.

use ledger_inflation::*;
use std::sync::Arc;

const DUST: u64 = 1_000_000;
const TOTAL_UNITS: u64 = 100_000_000_000;

fn id(n: usize) -> AccountId {
    AccountId::new(format!("A{n}"))
}

fn total_supply() -> LedgerAmount {
    LedgerAmount::from_units(TOTAL_UNITS, DUST)
}

fn make_accounts(
    balance_units: impl Fn(usize) -> u64,
    vote_for: impl Fn(usize) -> usize,
    fee_per_account: u64,
) -> Vec<Account> {
    (0..12)
        .map(|n| {
            let balance = LedgerAmount::from_units(balance_units(n), DUST)
                - LedgerAmount::from(fee_per_account);
            Account::new(id(n), balance).with_destination(id(vote_for(n)))
        })
        .collect()
}

/// Accounts 0-5 vote for 0, 6 for 2, 7 for 3, 8-11 for 1.
fn two_over_threshold_votes(n: usize) -> usize {
    match n {
        0..=5 => 0,
        6 => 2,
        7 => 3,
        _ => 1,
    }
}

/// Each account votes for the next; the last one wraps to account 0.
fn ring_votes(n: usize) -> usize {
    if n == 11 {
        0
    } else {
        n + 1
    }
}

fn round(sequence_number: u64, fee_pool: u64) -> InflationRound {
    InflationRound {
        sequence_number,
        fee_pool: LedgerAmount::from(fee_pool),
        total_supply_before: total_supply(),
    }
}

fn amount(dust: u64) -> LedgerAmount {
    LedgerAmount::from(dust)
}

#[test]
fn two_accounts_over_threshold() {
    let snapshot = AccountSnapshot::new(make_accounts(
        |n| (n as u64 + 1) * 100_000_000,
        two_over_threshold_votes,
        0,
    ))
    .unwrap();
    let params = InflationParams::default();

    let outcome = compute_round(&snapshot, &round(1, 0), &params).unwrap();

    let winners: Vec<&str> = outcome.winners.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(winners, vec!["A1", "A0"]);

    assert_eq!(outcome.prize_pool, amount(19_072_100_000_000));
    assert_eq!(outcome.award_for(&id(0)), amount(6_357_366_666_666));
    assert_eq!(outcome.award_for(&id(1)), amount(12_714_733_333_333));
    for n in 2..12 {
        assert!(outcome.award_for(&id(n)).is_zero(), "A{n} must not be awarded");
    }

    assert_eq!(outcome.total_distributed, amount(19_072_099_999_999));
    assert!(outcome.total_distributed < outcome.prize_pool);
    assert_eq!(outcome.rounding_loss(), amount(1));
    assert_eq!(
        outcome.new_total_supply,
        LedgerAmount::from(100_019_072_099_999_999u64)
    );

    let balances = outcome.apply_to(&snapshot);
    assert_eq!(
        balances[&id(0)],
        LedgerAmount::from_units(100_000_000, DUST) + amount(6_357_366_666_666)
    );
    assert_eq!(balances[&id(5)], LedgerAmount::from_units(600_000_000, DUST));
}

#[test]
fn nobody_over_threshold_awards_everyone() {
    let snapshot =
        AccountSnapshot::new(make_accounts(|n| (n as u64 + 1) * 1_000, ring_votes, 0)).unwrap();
    let params = InflationParams::default();

    let outcome = compute_round(&snapshot, &round(1, 0), &params).unwrap();

    assert_eq!(outcome.winners.len(), 12);
    assert_eq!(outcome.winners[0].id, id(0));
    assert_eq!(outcome.award_for(&id(0)), amount(2_934_169_230_769));
    assert_eq!(outcome.award_for(&id(11)), amount(2_689_655_128_205));
    assert_eq!(outcome.award_for(&id(1)), amount(244_514_102_564));
    assert_eq!(outcome.total_distributed, amount(19_072_099_999_995));
    assert_eq!(outcome.rounding_loss(), amount(5));
}

#[test]
fn fee_pool_is_recycled_whole() {
    // Every account paid two 12-dust fees before the round.
    let snapshot = AccountSnapshot::new(make_accounts(
        |n| (n as u64 + 1) * 100_000_000,
        two_over_threshold_votes,
        12,
    ))
    .unwrap();
    let params = InflationParams::default();

    let outcome = compute_round(&snapshot, &round(1, 288), &params).unwrap();

    assert_eq!(outcome.prize_pool, amount(19_072_100_000_287));
    assert_eq!(outcome.award_for(&id(0)), amount(6_357_366_666_762));
    assert_eq!(outcome.award_for(&id(1)), amount(12_714_733_333_524));
    assert_eq!(outcome.fee_pool_consumed, amount(288));
    assert_eq!(
        outcome.new_total_supply,
        LedgerAmount::from(100_019_072_099_999_998u64)
    );
}

#[test]
fn sequence_one_then_replay_then_gap() {
    let accounts = make_accounts(|n| (n as u64 + 1) * 100_000_000, two_over_threshold_votes, 0);
    let reserve = total_supply() - accounts.iter().map(|a| &a.balance).sum::<LedgerAmount>();
    let ledger = InMemoryAccountLedger::with_accounts(accounts, reserve);
    let engine = InflationEngine::with_clock(
        InflationParams::default(),
        Box::new(ledger),
        Arc::new(ManualClock::new(0)),
    )
    .unwrap();

    let first = engine.run_from_ledger(LedgerAmount::zero(), 1).unwrap();
    assert_eq!(engine.last_applied_sequence(), 1);
    assert_eq!(first.award_for(&id(1)), amount(12_714_733_333_333));

    let supply_after_first = engine.total_supply();
    assert_eq!(supply_after_first, first.new_total_supply);

    assert_eq!(
        engine.run_from_ledger(LedgerAmount::zero(), 1).unwrap_err(),
        RoundError::InvalidSequence { expected: 2, got: 1 }
    );
    assert_eq!(
        engine.run_from_ledger(LedgerAmount::zero(), 3).unwrap_err(),
        RoundError::InvalidSequence { expected: 2, got: 3 }
    );

    assert_eq!(engine.last_applied_sequence(), 1);
    assert_eq!(engine.total_supply(), supply_after_first);
    assert_eq!(
        engine.balance(&id(1)),
        Some(LedgerAmount::from_units(200_000_000, DUST) + amount(12_714_733_333_333))
    );
}

#[test]
fn anchored_schedule_rejects_early_round() {
    let clock = Arc::new(ManualClock::new(999));
    let params = InflationParams {
        schedule: RoundSchedule::Anchored {
            start_time: 1_000,
            frequency_secs: 2_592_000,
        },
        ..Default::default()
    };
    let ledger = InMemoryAccountLedger::with_accounts(
        make_accounts(|n| (n as u64 + 1) * 1_000, ring_votes, 0),
        LedgerAmount::zero(),
    );
    let engine = InflationEngine::with_clock(params, Box::new(ledger), clock.clone()).unwrap();

    assert_eq!(
        engine.run_from_ledger(LedgerAmount::zero(), 1).unwrap_err(),
        RoundError::TooSoon { now: 999, due_at: 1_000 }
    );
    clock.set(1_000);
    engine.run_from_ledger(LedgerAmount::zero(), 1).unwrap();

    clock.set(2_592_999);
    assert!(matches!(
        engine.run_from_ledger(LedgerAmount::zero(), 2),
        Err(RoundError::TooSoon { due_at: 2_593_000, .. })
    ));
    clock.set(2_593_000);
    engine.run_from_ledger(LedgerAmount::zero(), 2).unwrap();
    assert_eq!(engine.last_applied_sequence(), 2);
}

#[test]
fn votes_for_missing_accounts_count_as_self_votes() {
    let snapshot = AccountSnapshot::new(vec![
        Account::new("alice", 700u64).with_destination("deleted"),
        Account::new("bob", 300u64).with_destination("alice"),
    ])
    .unwrap();
    let params = InflationParams::default();
    let outcome = compute_round(
        &snapshot,
        &InflationRound {
            sequence_number: 1,
            fee_pool: LedgerAmount::zero(),
            total_supply_before: LedgerAmount::from(1_000_000_000u64),
        },
        &params,
    )
    .unwrap();

    assert_eq!(outcome.winners.len(), 1);
    assert_eq!(outcome.winners[0].id, AccountId::from("alice"));
    assert_eq!(outcome.winners[0].votes, amount(1_000));
    assert!(!outcome.awards.contains_key(&AccountId::from("deleted")));
}

#[test]
fn weekly_rounds_with_fees_keep_supply_consistent() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x1f1a);
    let params = InflationParams::default();
    let accounts: Vec<Account> = (0..40)
        .map(|n| {
            let units = rng.gen_range(1_000..5_000_000u64);
            let account = Account::new(id(n), LedgerAmount::from_units(units, DUST));
            if rng.gen_bool(0.7) {
                account.with_destination(id(rng.gen_range(0..8)))
            } else {
                account
            }
        })
        .collect();
    let mut ledger = InMemoryAccountLedger::with_accounts(accounts, LedgerAmount::zero());
    let mut tracker = SupplyTracker::new(ledger.total_supply());

    for sequence_number in 1..=12u64 {
        let mut fee_pool = LedgerAmount::zero();
        for _ in 0..rng.gen_range(0..30) {
            let payer = id(rng.gen_range(0..40));
            let fee = LedgerAmount::from(rng.gen_range(10..100u64));
            ledger.charge_fee(&payer, &fee).unwrap();
            fee_pool += fee;
        }

        let snapshot = ledger.snapshot().unwrap();
        let round = InflationRound {
            sequence_number,
            fee_pool: fee_pool.clone(),
            total_supply_before: ledger.total_supply(),
        };
        let outcome = compute_round(&snapshot, &round, &params).unwrap();
        assert!(outcome.total_distributed <= outcome.prize_pool);
        assert!(outcome.winners.len() <= params.num_winners);

        ledger.apply_round(&outcome).unwrap();
        tracker.record(&outcome);

        // The fee pool is fully paid out, so balances again cover all supply.
        let held: LedgerAmount = ledger.accounts().map(|a| &a.balance).sum();
        assert_eq!(held, ledger.total_supply());
    }

    let audit = tracker.audit();
    assert!(audit.is_healthy, "issues: {:?}", audit.issues);
    assert_eq!(tracker.rounds_recorded(), 12);
    assert_eq!(tracker.total_supply(), &ledger.total_supply());
    assert_eq!(
        tracker.genesis_supply().clone() + tracker.total_distributed()
            - tracker.total_fees_recycled(),
        ledger.total_supply()
    );
}
