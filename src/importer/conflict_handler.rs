// ==========================================
// 酒店营收报表系统 - 冲突处理器实现
// ==========================================
// 职责: 同表内重复自然键处理（后出现者覆盖先出现者）
// 说明: 跨批次重复由落库 upsert 处理，这里只管单表
// ==========================================

use crate::domain::report::SkipRecorder;
use crate::domain::types::SkipReason;
use crate::importer::report_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::HashMap;
use std::hash::Hash;

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    fn keep_last<T, K, F>(&self, records: Vec<(usize, T)>, key_of: F, recorder: &mut SkipRecorder) -> Vec<T>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        // 每个键最后一次出现的位置
        let mut last_position: HashMap<K, usize> = HashMap::with_capacity(records.len());
        for (position, (_, record)) in records.iter().enumerate() {
            last_position.insert(key_of(record), position);
        }

        let mut kept = Vec::with_capacity(last_position.len());
        for (position, (line, record)) in records.into_iter().enumerate() {
            if last_position.get(&key_of(&record)) == Some(&position) {
                kept.push(record);
            } else {
                recorder.record(line, SkipReason::DuplicateKey);
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::SheetImportStats;

    #[test]
    fn test_no_duplicates() {
        let mut recorder = SheetImportStats::with_sample_limit(20);
        let kept = ConflictHandler.keep_last(vec![(2, ("a", 1)), (3, ("b", 2))], |r| r.0, &mut recorder);

        assert_eq!(kept, vec![("a", 1), ("b", 2)]);
        assert_eq!(recorder.finish(2).skipped_rows, 0);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let mut recorder = SheetImportStats::with_sample_limit(20);
        let records = vec![(2, ("a", 1)), (3, ("b", 2)), (4, ("a", 3)), (5, ("a", 4))];
        let kept = ConflictHandler.keep_last(records, |r| r.0, &mut recorder);

        assert_eq!(kept, vec![("b", 2), ("a", 4)]);

        let stats = recorder.finish(kept.len());
        assert_eq!(stats.skipped_rows, 2);
        assert_eq!(stats.skips[0].row, 2);
        assert_eq!(stats.skips[1].row, 4);
        assert!(stats.skips.iter().all(|s| s.reason == SkipReason::DuplicateKey));
    }
}
