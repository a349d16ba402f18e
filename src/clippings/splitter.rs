pub const SEPARATOR: &str = "==========";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClippingRecord<'a> {
    // 区切りで分けた順番 (1 始まり)．空のクリップも番号を消費する
    pub ordinal: usize,
    pub raw: &'a str,
    pub lines: Vec<&'a str>,
}

// 区切り文字列で分割し，空白だけのものは捨てる
pub fn split_clippings(txt: &str) -> Vec<ClippingRecord<'_>> {
    txt.split(SEPARATOR)
        .enumerate()
        .filter_map(|(i, entry)| {
            let raw = entry.trim();
            if raw.is_empty() {
                return None;
            }

            Some(ClippingRecord {
                ordinal: i + 1,
                raw,
                lines: raw.lines().collect(),
            })
        })
        .collect()
}
