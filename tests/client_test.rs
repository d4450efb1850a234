use spotedit::{spotify::client::removal_batches, types::Occurrence};

fn occurrence(id: &str, positions: &[usize]) -> Occurrence {
    Occurrence {
        id: id.to_string(),
        positions: positions.to_vec(),
    }
}

// Applies batches one request at a time, checking every position against
// the playlist as it stands when that request arrives.
fn apply(playlist: &mut Vec<String>, batches: &[Vec<Occurrence>]) {
    for batch in batches {
        let mut positions = Vec::new();
        for o in batch {
            for &p in &o.positions {
                assert_eq!(playlist[p], o.id, "{} is not at {}", o.id, p);
                positions.push(p);
            }
        }
        positions.sort_unstable();
        for p in positions.into_iter().rev() {
            playlist.remove(p);
        }
    }
}

#[test]
fn test_removal_batches_stay_valid_past_one_request() {
    let mut playlist: Vec<String> = (0..150).map(|i| format!("t{}", i)).collect();
    let occurrences: Vec<Occurrence> = (0..150)
        .map(|i| occurrence(&format!("t{}", i), &[i]))
        .collect();

    let batches = removal_batches(&occurrences);

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 100);
    assert_eq!(batches[1].len(), 50);
    // The tail of the playlist goes first
    assert!(batches[0].iter().all(|o| o.positions[0] >= 50));

    apply(&mut playlist, &batches);
    assert!(playlist.is_empty());
}

#[test]
fn test_removal_batches_keep_surviving_tracks() {
    // t0..t239, removing every even slot
    let mut playlist: Vec<String> = (0..240).map(|i| format!("t{}", i % 2)).collect();
    let even: Vec<usize> = (0..240).step_by(2).collect();

    let batches = removal_batches(&[occurrence("t0", &even)]);

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0][0].positions.len(), 100);
    assert_eq!(batches[1][0].positions.len(), 20);

    apply(&mut playlist, &batches);
    assert_eq!(playlist.len(), 120);
    assert!(playlist.iter().all(|t| t == "t1"));
}

#[test]
fn test_small_removal_is_one_request() {
    let batches = removal_batches(&[occurrence("a", &[3, 0]), occurrence("b", &[1])]);

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert!(batches[0].iter().any(|o| o.id == "a" && o.positions.len() == 2));
}
