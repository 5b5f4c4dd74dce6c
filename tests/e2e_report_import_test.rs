// ==========================================
// 报表导入端到端测试
// ==========================================
// 流程: 生成 xlsx → ImportApi → 落库 → OverviewApi
// ==========================================


use chrono::NaiveDate;
use hotel_revenue::domain::SheetKind;
use hotel_revenue::domain::SkipReason;
use hotel_revenue::repository::{MetricRepository, MetricRepositoryImpl};
use test_helpers::*;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_august_workbook_full_flow() {
    let (_temp_file, state) = create_test_state();

    // 步骤 1: 导入
    let response = state
        .import_api
        .import_workbook(&august_workbook(), 2025, 8)
        .await
        .expect("导入失败");

    assert!(response.ok);
    assert!(response.batch_id.is_some());
    assert_eq!(response.summaries.len(), 4);

    // 步骤 2: 每张表的汇总
    let daily = &response.summaries[0];
    assert_eq!(daily.sheet, "Daily");
    assert_eq!(daily.kind, Some(SheetKind::Daily));
    assert_eq!(daily.upserts, Some(21));
    assert_eq!(daily.skipped_rows, Some(1));
    assert_eq!(daily.skips[0].reason, SkipReason::NoDate);
    assert_eq!(daily.skips[0].row, 23);

    let room_types = &response.summaries[1];
    assert_eq!(room_types.kind, Some(SheetKind::RoomTypes));
    assert_eq!(room_types.upserts, Some(4));

    assert_eq!(response.summaries[2].reason.as_deref(), Some("unrecognized"));
    assert_eq!(response.summaries[3].reason.as_deref(), Some("empty"));

    // 步骤 3: 落库结果
    let repo = MetricRepositoryImpl::new(&state.db_path).unwrap();
    let stored = repo
        .find_daily_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    assert_eq!(stored.len(), 21);
    assert_eq!(stored.first().unwrap().date, ymd(2025, 8, 1));
    assert_eq!(stored.last().unwrap().date, ymd(2025, 8, 21));
    assert_eq!(stored[0].occupancy, Some(62.0));

    let rooms = repo
        .find_room_types_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    assert_eq!(rooms.len(), 4);
    assert!(rooms.iter().all(|r| r.date == ymd(2025, 8, 31)));

    // 步骤 4: 概览
    let overview = state
        .overview_api
        .get_overview(ymd(2025, 8, 1), ymd(2025, 8, 21))
        .await
        .unwrap();
    assert_eq!(overview.revenue_to_date, DAILY_FIXTURE_REVENUE_SUM);
    assert_eq!(overview.target_to_date, DAILY_FIXTURE_TARGET_SUM);
    assert_eq!(
        overview.target_variance,
        DAILY_FIXTURE_TARGET_SUM - DAILY_FIXTURE_REVENUE_SUM
    );
    assert_eq!(overview.daily_series.len(), 21);
    assert_eq!(overview.daily_series[20].day, 21);

    // 房型快照落在 8-31，不在 1-21 区间内
    assert!(overview.room_types.is_empty());

    let month = state
        .overview_api
        .get_overview(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    let names: Vec<&str> = month.room_types.iter().map(|r| r.room_type.as_str()).collect();
    assert_eq!(names, vec!["Deluxe", "Executive", "Standard", "Suite"]);

    let suite = &month.room_types[3];
    assert_eq!(suite.sold, 62.0);
    assert_eq!(suite.rate, Some(3000.0));
    assert_eq!(suite.occupancy, Some(50.0));
}

#[tokio::test]
async fn test_replay_is_idempotent() {
    let (_temp_file, state) = create_test_state();
    let bytes = august_workbook();

    let first = state.import_api.import_workbook(&bytes, 2025, 8).await.unwrap();
    let repo = MetricRepositoryImpl::new(&state.db_path).unwrap();
    let daily_before = repo
        .find_daily_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    let rooms_before = repo
        .find_room_types_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();

    let second = state.import_api.import_workbook(&bytes, 2025, 8).await.unwrap();

    let upserts = |r: &hotel_revenue::api::ImportApiResponse| -> Vec<Option<usize>> {
        r.summaries.iter().map(|s| s.upserts).collect()
    };
    assert_eq!(upserts(&first), upserts(&second));
    assert_ne!(first.batch_id, second.batch_id);

    let daily_after = repo
        .find_daily_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    let rooms_after = repo
        .find_room_types_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    assert_eq!(daily_before, daily_after);
    assert_eq!(rooms_before, rooms_after);
}

#[tokio::test]
async fn test_serial_dates_and_day_numbers() {
    let (_temp_file, state) = create_test_state();

    // 序列号日期与纯日号两种写法
    let bytes = build_xlsx(&[
        (
            "Serial",
            grid(&[
                &["Date", "Target", "Revenue"],
                &["45870", "1000", "900"],
                &["45890", "1000", "950"],
            ]),
        ),
        (
            "Days",
            grid(&[
                &["Day", "Target", "Revenue"],
                &["2", "1000", "910"],
                &["32", "1000", "920"],
            ]),
        ),
    ]);

    let response = state.import_api.import_workbook(&bytes, 2025, 8).await.unwrap();
    assert_eq!(response.summaries[0].upserts, Some(2));
    assert_eq!(response.summaries[1].upserts, Some(1));
    assert_eq!(response.summaries[1].skips[0].reason, SkipReason::InvalidDay);

    let repo = MetricRepositoryImpl::new(&state.db_path).unwrap();
    let dates: Vec<NaiveDate> = repo
        .find_daily_between(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.date)
        .collect();
    assert_eq!(dates, vec![ymd(2025, 8, 1), ymd(2025, 8, 2), ymd(2025, 8, 21)]);
}

#[tokio::test]
async fn test_native_excel_date_cells() {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    let (_temp_file, state) = create_test_state();

    // 日期列写成 Excel 原生日期单元格（带日期格式的数值）
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Daily").unwrap();
    worksheet.write_string(0, 0, "Date").unwrap();
    worksheet.write_string(0, 1, "Target").unwrap();
    worksheet.write_string(0, 2, "Revenue").unwrap();

    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let datetime = ExcelDateTime::from_ymd(2025, 8, 21).unwrap();
    worksheet
        .write_datetime_with_format(1, 0, &datetime, &date_format)
        .unwrap();
    worksheet.write_number(1, 1, 120000.0).unwrap();
    worksheet.write_number(1, 2, 118500.0).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let response = state.import_api.import_workbook(&bytes, 2025, 8).await.unwrap();
    assert_eq!(response.summaries[0].upserts, Some(1));
    assert_eq!(response.summaries[0].skipped_rows, Some(0));

    let stored = state.metric_api.get_daily_entry(ymd(2025, 8, 21)).await.unwrap();
    assert_eq!(stored.revenue, Some(118500.0));
}

#[tokio::test]
async fn test_room_count_without_available_nights() {
    let (_temp_file, state) = create_test_state();

    // 只有房间数（4 间），没有可售间夜
    let bytes = build_xlsx(&[(
        "Room Types",
        grid(&[
            &["Room Type", "Rooms", "Sold", "Revenue"],
            &["Suite", "4", "62", "186000"],
        ]),
    )]);
    state.import_api.import_workbook(&bytes, 2025, 8).await.unwrap();

    let overview = state
        .overview_api
        .get_overview(ymd(2025, 8, 1), ymd(2025, 8, 31))
        .await
        .unwrap();
    let suite = &overview.room_types[0];
    assert_eq!(suite.available, 0.0);
    assert_eq!(suite.occupancy, None);
    assert_eq!(suite.rate, Some(3000.0));
}
