use std::collections::HashMap;

const PART_DELIMITER: char = ' ';
const THRESHOLD: i64 = 1000;

/// Ranks the names in `pool` by similarity to `name`, most similar first.
///
/// Names are compared part by part (parts are separated by a space) and as a
/// whole. A candidate is kept when it is within a third of the input length
/// in edit distance, or when one string contains the other.
pub fn find_alternatives<'a, I>(name: &str, pool: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let pool: Vec<&str> = pool.into_iter().collect();
    let mut scores = Scores::default();

    let pool_parts: Vec<Vec<&str>> = pool
        .iter()
        .map(|item| item.split(PART_DELIMITER).collect())
        .collect();

    for (i, subname) in name.split(PART_DELIMITER).enumerate() {
        for (item, parts) in pool.iter().zip(&pool_parts) {
            let exists = scores.contains(item);
            let Some(part) = parts.get(i) else {
                if exists {
                    scores.add(item, THRESHOLD);
                }
                continue;
            };

            let lev = levenshtein(subname, part) as i64;
            if within_third(lev, subname) || (!subname.is_empty() && part.contains(subname)) {
                scores.add(item, lev);
            } else if exists {
                scores.add(item, THRESHOLD);
            }
        }
    }

    for item in &pool {
        let lev = levenshtein(name, item) as i64;
        let contains = !name.is_empty() && (item.contains(name) || name.contains(item));
        if within_third(lev, name) || contains {
            if scores.contains(item) {
                scores.add(item, -lev);
            } else {
                scores.add(item, lev);
            }
        }
    }

    scores.into_ranked()
}

/// Edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if b.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn within_third(lev: i64, s: &str) -> bool {
    lev * 3 <= s.chars().count() as i64
}

// Accumulated scores, remembering the order candidates were first scored in
// so that equal scores keep a stable order.
#[derive(Default)]
struct Scores {
    order: Vec<String>,
    values: HashMap<String, i64>,
}

impl Scores {
    fn contains(&self, item: &str) -> bool {
        self.values.contains_key(item)
    }

    fn add(&mut self, item: &str, delta: i64) {
        match self.values.get_mut(item) {
            Some(value) => *value += delta,
            None => {
                self.order.push(item.to_string());
                self.values.insert(item.to_string(), delta);
            }
        }
    }

    fn into_ranked(self) -> Vec<String> {
        let Scores { order, values } = self;
        let mut ranked: Vec<(String, i64)> = order
            .into_iter()
            .filter_map(|item| {
                let score = values[&item];
                (score < 2 * THRESHOLD).then_some((item, score))
            })
            .collect();
        ranked.sort_by_key(|(_, score)| *score);
        ranked.into_iter().map(|(item, _)| item).collect()
    }
}
