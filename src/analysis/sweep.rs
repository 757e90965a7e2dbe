/// Line indices within `radius` of `center`, nearest first, alternating
/// backwards then forwards at each distance.
pub fn sweep_order(center: usize, len: usize, radius: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(radius * 2);
    for d in 1..=radius {
        if let Some(back) = center.checked_sub(d) { out.push(back); }
        if center + d < len { out.push(center + d); }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_outward() {
        assert_eq!(sweep_order(4, 10, 3), vec![3, 5, 2, 6, 1, 7]);
    }

    #[test]
    fn clipped_at_line_ends() {
        assert_eq!(sweep_order(1, 3, 3), vec![0, 2]);
        assert_eq!(sweep_order(0, 1, 3), Vec::<usize>::new());
    }
}
