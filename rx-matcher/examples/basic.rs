use rx_matcher::{Matcher, Regex};

fn main() -> Result<(), rx_matcher::BuildError> {
    // A single match.
    let re = Regex::new(r"\d+\.\d+\.\d+\.\d+")?;
    let mut m = Matcher::new();
    let hay = b"There's no place like 127.0.0.1.";
    if let Some(found) = re.find(&mut m, hay) {
        println!("{}", String::from_utf8_lossy(&hay[found.range()]));
    }

    // A global match.
    let re = Regex::new(r"\w+")?;
    let hay = b"Ricochet pinecone riverside elderberry";
    for word in re.find_iter(&mut m, hay) {
        println!("{}", String::from_utf8_lossy(&hay[word.range()]));
    }

    // Captures.
    let re = Regex::new("b((an)+)(an)")?;
    let hay = b"bananana";
    if re.match_at(&mut m, hay, 0) {
        for i in 0..m.cap_count() {
            match m.capture_bytes(hay, i) {
                Some(bytes) => println!("{i}: {}", String::from_utf8_lossy(bytes)),
                None => println!("{i}: ~"),
            }
        }
    }

    // The compiled graph, for piping into a DOT renderer.
    let re = Regex::new("a(b|c)*d")?;
    print!("{}", re.to_dot());

    Ok(())
}
