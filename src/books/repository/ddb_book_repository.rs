use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::Utc;

use crate::books::domain::model::{BookEntity, BookFields, BookPatch};
use crate::books::repository::{BookRepository, QUERYABLE_ATTRIBUTES};
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_bool_attribute, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

// SET clause, attribute names and values for the present patch fields
fn patch_expression(patch: &BookPatch) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
    let mut sets = vec!["#version = #version + :one".to_string(), "#updated_at = :updated_at".to_string()];
    let mut names = HashMap::from([
        ("#version".to_string(), "version".to_string()),
        ("#updated_at".to_string(), "updated_at".to_string()),
    ]);
    let mut values = HashMap::from([
        (":one".to_string(), AttributeValue::N("1".to_string())),
        (":updated_at".to_string(), string_date(Utc::now().naive_utc())),
    ]);
    let strings = [
        ("title", &patch.title),
        ("description", &patch.description),
        ("author", &patch.author),
        ("language", &patch.language),
        ("category", &patch.category),
        ("image", &patch.image),
    ];
    for (name, value) in strings {
        if let Some(value) = value {
            sets.push(format!("#{} = :{}", name, name));
            names.insert(format!("#{}", name), name.to_string());
            values.insert(format!(":{}", name), AttributeValue::S(value.to_string()));
        }
    }
    for (name, value) in [("featured", patch.featured), ("available", patch.available)] {
        if let Some(value) = value {
            sets.push(format!("#{} = :{}", name, name));
            names.insert(format!("#{}", name), name.to_string());
            values.insert(format!(":{}", name), AttributeValue::Bool(value));
        }
    }
    (format!("SET {}", sets.join(", ")), names, values)
}

#[async_trait]
impl Repository<BookEntity, BookPatch> for DDBBookRepository {
    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .consistent_read(true)
            .key("book_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(LibraryError::from).map(|res| res.item().map(map_to_book))
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let (expr, names, values) = patch_expression(patch);
        let res = self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .update_expression(expr)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .condition_expression("attribute_exists(book_id)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        match res {
            Ok(out) => {
                Ok(out.attributes().map(map_to_book))
            }
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_conditional_check_failed_exception() => {
                Ok(None)
            }
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn delete(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await.map_err(LibraryError::from).map(|res| {
            res.attributes().filter(|attrs| !attrs.is_empty()).map(map_to_book)
        })
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        let mut request = self.client
            .scan()
            .table_name(table_name)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size.max(1), 500) as i32);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if !QUERYABLE_ATTRIBUTES.contains(&k.as_str()) {
                return Err(LibraryError::validation(format!("cannot query books by {}", k).as_str(), None));
            }
            let ks = add_filter_expr(k.as_str(), &mut filter_expr);
            request = request
                .expression_attribute_names(format!("#{}", ks), ks.to_string())
                .expression_attribute_values(format!(":{}", ks), AttributeValue::S(v.to_string()));
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }

        request
            .send()
            .await.map_err(LibraryError::from).map(|res| {
            let records = res.items().unwrap_or_default().iter()
                .map(map_to_book).collect();
            from_ddb(page, page_size, res.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn create(&self, fields: &BookFields, image: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let book = BookEntity::new(fields, image);
        let val = serde_json::to_value(&book)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| book).map_err(LibraryError::from)
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        book_id: parse_string_attribute("book_id", map).unwrap_or_default(),
        version: parse_number_attribute("version", map),
        title: parse_string_attribute("title", map).unwrap_or_default(),
        description: parse_string_attribute("description", map).unwrap_or_default(),
        author: parse_string_attribute("author", map).unwrap_or_default(),
        language: parse_string_attribute("language", map).unwrap_or_default(),
        category: parse_string_attribute("category", map).unwrap_or_default(),
        featured: parse_bool_attribute("featured", map),
        available: parse_bool_attribute("available", map),
        image: parse_string_attribute("image", map).unwrap_or_default(),
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
    }
}
