use super::*;

fn records(entries: &[(bool, &str)]) -> Vec<(bool, String)> {
    entries.iter().map(|(u, l)| (*u, l.to_string())).collect()
}

#[test]
fn lines_and_columns_sort_numerically() {
    let mut list = records(&[
        (false, "a.cpp:10:1"),
        (true, "a.cpp:9:2"),
        (false, "a.cpp:9:10"),
        (false, "a.cpp:9:9"),
    ]);
    sort_records(&mut list);
    assert_eq!(
        list,
        records(&[
            (true, "a.cpp:9:2"),
            (false, "a.cpp:9:9"),
            (false, "a.cpp:9:10"),
            (false, "a.cpp:10:1"),
        ])
    );
}

#[test]
fn files_sort_before_positions() {
    let mut list = records(&[(false, "b.cpp:1:1"), (false, "a.cpp:99:99")]);
    sort_records(&mut list);
    assert_eq!(list, records(&[(false, "a.cpp:99:99"), (false, "b.cpp:1:1")]));
}

#[test]
fn colons_in_directory_names_do_not_confuse_the_sort() {
    // Only the last two segments are positions.
    let mut list = records(&[(false, "we:ird/a.cpp:2:1"), (false, "we:ird/a.cpp:1:1")]);
    sort_records(&mut list);
    assert_eq!(
        list,
        records(&[(false, "we:ird/a.cpp:1:1"), (false, "we:ird/a.cpp:2:1")])
    );
}

#[test]
fn report_lines_use_zero_one_prefixes() {
    let list = records(&[(true, "a.cpp:1:2"), (false, "b.cpp:3:4")]);
    let mut out = Vec::new();
    write_report(&list, &mut out).expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "1 a.cpp:1:2\n0 b.cpp:3:4\n"
    );
}
