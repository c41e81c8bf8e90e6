use subway_sections::core::{Section, SectionId, StationId};
use subway_sections::{SectionChain, SectionChainError};

fn s(id: u64) -> StationId {
    StationId(id)
}

fn chain_of(stations: &[(u64, u64, u64)]) -> SectionChain {
    let sections = stations
        .iter()
        .enumerate()
        .map(|(i, (up, down, distance))| {
            Section::new(SectionId(i as u64 + 1), s(*up), s(*down), *distance).unwrap()
        })
        .collect();
    SectionChain::from_sections(sections).unwrap()
}

fn assert_invariants(chain: &SectionChain) {
    let stations = chain.ordered_station_ids();
    assert_eq!(stations.len(), chain.section_count() + 1);

    let mut unique = stations.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), stations.len());

    let summed: u64 = chain.sections().map(Section::distance).sum();
    assert_eq!(chain.total_distance(), summed);

    for pair in chain.sections().collect::<Vec<_>>().windows(2) {
        assert_eq!(pair[0].down_station_id(), pair[1].up_station_id());
    }
}

#[test]
fn scenario_a_extend_down_terminus() {
    let mut chain = chain_of(&[(1, 2, 10)]);

    chain.add(SectionId(2), s(2), s(3), 3).unwrap();

    assert_eq!(chain.ordered_station_ids(), vec![s(1), s(2), s(3)]);
    assert_eq!(chain.total_distance(), 13);
}

#[test]
fn scenario_b_attach_at_up_terminus_splits() {
    let mut chain = chain_of(&[(1, 2, 10)]);

    chain.add(SectionId(2), s(1), s(3), 3).unwrap();

    assert_eq!(chain.ordered_station_ids(), vec![s(1), s(3), s(2)]);
    assert_eq!(chain.total_distance(), 10);
    assert_invariants(&chain);
}

#[test]
fn scenario_c_remove_down_terminus() {
    let mut chain = chain_of(&[(1, 2, 10), (2, 3, 4)]);

    let removed = chain.remove(s(3)).unwrap();

    assert_eq!(removed.distance(), 4);
    assert_eq!(chain.ordered_station_ids(), vec![s(1), s(2)]);
    assert_eq!(chain.total_distance(), 10);
}

#[test]
fn scenario_d_remove_up_terminus_is_rejected() {
    let mut chain = chain_of(&[(1, 2, 10), (2, 3, 4)]);

    let err = chain.remove(s(1)).unwrap_err();

    assert_eq!(
        err,
        SectionChainError::NotTerminus {
            station: s(1),
            terminus: s(3)
        }
    );
    assert_eq!(chain.section_count(), 2);
}

#[test]
fn scenario_e_single_section_cannot_shrink() {
    let mut chain = chain_of(&[(1, 2, 10)]);

    for station in [1, 2, 3] {
        assert_eq!(chain.remove(s(station)), Err(SectionChainError::MinimumSection));
    }
    assert_eq!(chain.ordered_station_ids(), vec![s(1), s(2)]);
}

#[test]
fn repeated_add_is_duplicate() {
    let mut chain = chain_of(&[(1, 2, 10)]);
    chain.add(SectionId(2), s(2), s(3), 3).unwrap();

    assert!(matches!(
        chain.add(SectionId(3), s(2), s(3), 3),
        Err(SectionChainError::DuplicateSection { .. })
    ));
}

#[test]
fn interior_split_on_both_sides() {
    let mut chain = chain_of(&[(1, 2, 10), (2, 3, 10), (3, 4, 10)]);

    // After station 2, before station 3.
    chain.add(SectionId(10), s(2), s(5), 4).unwrap();
    chain.add(SectionId(11), s(6), s(3), 2).unwrap();

    assert_eq!(
        chain.ordered_station_ids(),
        vec![s(1), s(2), s(5), s(6), s(3), s(4)]
    );
    let distances: Vec<u64> = chain.sections().map(Section::distance).collect();
    assert_eq!(distances, vec![10, 4, 4, 2, 10]);
    assert_eq!(chain.total_distance(), 30);
    assert_invariants(&chain);
}

#[test]
fn rejected_split_leaves_chain_untouched() {
    let mut chain = chain_of(&[(1, 2, 10), (2, 3, 5)]);
    let before: Vec<Section> = chain.sections().cloned().collect();

    assert!(matches!(
        chain.add(SectionId(9), s(2), s(7), 5),
        Err(SectionChainError::InvalidDistance { .. })
    ));
    assert!(matches!(
        chain.add(SectionId(9), s(7), s(2), 12),
        Err(SectionChainError::InvalidDistance { .. })
    ));

    let after: Vec<Section> = chain.sections().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn invariants_hold_across_mixed_operations() {
    let mut chain = chain_of(&[(0, 1, 1000)]);
    let mut next_station = 2;
    let mut next_section = 2;
    // Deterministic LCG so the walk is reproducible.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

    for _ in 0..300 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let stations = chain.ordered_station_ids();
        let pick = stations[(seed >> 33) as usize % stations.len()];
        let distance = (seed >> 50) % 40 + 1;
        let before = chain.total_distance();

        let result = match (seed >> 20) % 4 {
            0 => chain.remove(chain.down_terminus()).map(|_| ()),
            1 => chain.add(SectionId(next_section), pick, s(next_station), distance),
            2 => chain.add(SectionId(next_section), s(next_station), pick, distance),
            _ => chain.add(
                SectionId(next_section),
                pick,
                stations[(seed >> 40) as usize % stations.len()],
                distance,
            ),
        };

        match result {
            Ok(()) => {
                next_station += 1;
                next_section += 1;
            }
            Err(SectionChainError::InvalidDistance { .. })
            | Err(SectionChainError::MinimumSection)
            | Err(SectionChainError::DuplicateSection { .. })
            | Err(SectionChainError::InvalidSection { .. }) => {
                assert_eq!(chain.total_distance(), before);
            }
            Err(other) => panic!("unexpected rejection: {}", other),
        }

        assert_invariants(&chain);
    }
}
