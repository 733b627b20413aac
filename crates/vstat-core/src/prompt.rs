//! Fixed prompts sent to the LLM stage

/// Database schema description embedded into the system prompt
pub const SCHEMA_DESCRIPTION: &str = "\
У тебя есть база данных с двумя таблицами:

1. Таблица videos (финальная статистика по видео):
   - id: UUID - уникальный идентификатор видео
   - creator_id: UUID - идентификатор создателя видео
   - video_created_at: TIMESTAMP - дата и время публикации видео
   - views_count: INTEGER - финальное количество просмотров
   - likes_count: INTEGER - финальное количество лайков
   - comments_count: INTEGER - финальное количество комментариев
   - reports_count: INTEGER - финальное количество жалоб
   - created_at: TIMESTAMP - время создания записи
   - updated_at: TIMESTAMP - время последнего обновления

2. Таблица video_snapshots (почасовые замеры статистики):
   - id: UUID - уникальный идентификатор замера
   - video_id: UUID - ссылка на видео (внешний ключ к videos.id)
   - views_count: INTEGER - количество просмотров на момент замера
   - likes_count: INTEGER - количество лайков на момент замера
   - comments_count: INTEGER - количество комментариев на момент замера
   - reports_count: INTEGER - количество жалоб на момент замера
   - delta_views_count: INTEGER - прирост просмотров с прошлого замера
   - delta_likes_count: INTEGER - прирост лайков с прошлого замера
   - delta_comments_count: INTEGER - прирост комментариев с прошлого замера
   - delta_reports_count: INTEGER - прирост жалоб с прошлого замера
   - created_at: TIMESTAMP - время замера (раз в час)
   - updated_at: TIMESTAMP - время обновления записи

Правила работы:
- Все запросы должны возвращать только ОДНО число
- Используй COUNT(*) для подсчета количества
- Используй SUM() для суммирования
- Для приростов используй delta_* поля из video_snapshots
- Даты в запросах могут быть на русском языке (например: \"28 ноября 2025\", \"с 1 по 5 ноября\")
- Работай с датами в формате PostgreSQL
";

/// Build the full system prompt: schema description plus output-format rules
pub fn system_prompt() -> String {
    format!(
        "{SCHEMA_DESCRIPTION}\n\
        Твоя задача: на основе вопроса пользователя на русском языке сгенерировать SQL-запрос к PostgreSQL,\n\
        который вернет ровно ОДНО число как ответ.\n\
        \n\
        Формат ответа должен быть ТОЛЬКО JSON:\n\
        {{\n\
          \"sql\": \"SELECT COUNT(*) FROM videos WHERE ...\",\n\
          \"explanation\": \"краткое объяснение того, что делает запрос\"\n\
        }}\n\
        \n\
        Важно:\n\
        - SQL должен возвращать только одно число (COUNT, SUM и т.д.)\n\
        - Используй правильные имена таблиц и полей\n\
        - Учитывай даты и фильтры из вопроса\n\
        - Не добавляй никакого дополнительного текста вне JSON\n"
    )
}
