use rand::Rng;
use rowexpr::access::{FieldDef, Row, RowData, RowDataSource, RowDataTarget, RowDef, ValuesRow};
use rowexpr::expression::{
    compose_scalar, evaluate_expression, ColumnExpression, Expression, ExpressionError,
    LiteralExpression,
};
use rowexpr::types::extract::{bits_to_double, double_to_bits, get_double};
use rowexpr::types::{TypeTag, Value, ValueSource, ValueTarget};
use std::sync::Arc;
use std::thread;

fn column(field: &FieldDef) -> Box<dyn Expression> {
    Box::new(ColumnExpression::for_field(field))
}

fn lit(value: Value) -> Box<dyn Expression> {
    Box::new(LiteralExpression::new(value))
}

#[test]
fn test_shift_over_encoded_row() -> anyhow::Result<()> {
    let row_def = Arc::new(RowDef::new(vec![
        FieldDef::new("bits", TypeTag::UBigInt),
        FieldDef::new("amount", TypeTag::Long),
    ]));
    let row = RowData::encode(row_def.clone(), &[Value::ubigint(5), Value::Long(1)])?;

    // Decoding through the directory gives the same values back
    let decoded = RowData::from_bytes(row_def.clone(), row.as_bytes().to_vec())?;
    assert_eq!(decoded.values()?, vec![Value::ubigint(5), Value::Long(1)]);

    let expr = compose_scalar(
        "leftshift",
        vec![column(&row_def.fields()[0]), column(&row_def.fields()[1])],
    )?;
    assert_eq!(expr.value_type(), TypeTag::UBigInt);
    assert_eq!(expr.to_string(), "LEFT_SHIFT(bits, amount)");
    assert_eq!(
        evaluate_expression(expr.as_ref(), Arc::new(decoded))?,
        Value::ubigint(10)
    );
    Ok(())
}

#[test]
fn test_one_evaluation_many_rows() -> anyhow::Result<()> {
    let row_def = Arc::new(RowDef::new(vec![
        FieldDef::new("a", TypeTag::UBigInt),
        FieldDef::new("b", TypeTag::UBigInt),
    ]));
    let expr = compose_scalar(
        "bitxor",
        vec![column(&row_def.fields()[0]), column(&row_def.fields()[1])],
    )?;

    let mut evaluation = expr.evaluation();
    for (a, b) in [(1u64, 3u64), (0xF0, 0x0F), (u64::MAX, 1)] {
        let row = RowData::encode(row_def.clone(), &[Value::ubigint(a), Value::ubigint(b)])?;
        evaluation.of(Arc::new(row));
        assert_eq!(evaluation.eval()?, &Value::ubigint(a ^ b));
    }

    let row = RowData::encode(row_def.clone(), &[Value::Null, Value::ubigint(1)])?;
    evaluation.of(Arc::new(row));
    assert_eq!(evaluation.eval()?, &Value::Null);
    Ok(())
}

#[test]
fn test_double_bit_patterns_through_row_buffer() -> anyhow::Result<()> {
    let cases: [(f64, u64); 10] = [
        (-0.0, 0x8000000000000000),
        (0.0, 0x0000000000000000),
        (-1.0, 0xBFF0000000000000),
        (1.0, 0x3FF0000000000000),
        (839573957392.29575739275, 0x42686F503D620977),
        (-0.986730586093, 0xBFEF934C05A76F64),
        (428732459843.84344482421875, 0x4258F49C8AD0F5FB),
        (2.7182818284, 0x4005BF0A8B12500B),
        (-9007199250000000.0, 0xC33FFFFFFFB7A880),
        (7385632847582937583.0, 0x43D99FC27C6C68D0),
    ];

    let field = FieldDef::new("c1", TypeTag::Double);
    for (value, bits) in cases {
        let mut bytes = vec![0u8; 128];
        let width = {
            let mut target = RowDataTarget::bind(&field, &mut bytes, 0);
            target.put(Value::Double(value))?;
            target.last_encoded_length()
        };
        assert_eq!(width, 8);
        assert_eq!(&bytes[..8], &bits.to_le_bytes());

        let source = RowDataSource::bind(&field, &bytes, 0, width);
        let decoded = get_double(&source.value()?)?;
        assert_eq!(decoded.to_bits(), bits, "bits of {}", value);
        assert_eq!(double_to_bits(decoded), bits);
    }
    Ok(())
}

#[test]
fn test_null_for_every_kind() -> anyhow::Result<()> {
    for type_tag in TypeTag::ALL {
        if type_tag == TypeTag::Unsupported {
            continue;
        }
        let field = FieldDef::new("f", type_tag);
        let mut bytes = vec![0u8; 32];
        let mut target = RowDataTarget::bind(&field, &mut bytes, 0);
        target.put(Value::Null)?;
        assert_eq!(target.last_encoded_length(), 0, "{}", type_tag);

        let source = RowDataSource::bind(&field, &bytes, 0, 0);
        assert!(source.is_null());
        assert_eq!(source.value()?, Value::Null);
    }
    Ok(())
}

#[test]
fn test_wrong_arity_fails_at_composition() {
    for name in ["bitand", "bitor", "bitxor", "leftshift", "rightshift"] {
        let one = vec![lit(Value::ubigint(1))];
        assert!(matches!(
            compose_scalar(name, one),
            Err(ExpressionError::WrongArity {
                expected: 2,
                actual: 1,
                ..
            })
        ));

        let three = vec![
            lit(Value::ubigint(1)),
            lit(Value::ubigint(2)),
            lit(Value::ubigint(3)),
        ];
        assert!(matches!(
            compose_scalar(name, three),
            Err(ExpressionError::WrongArity { actual: 3, .. })
        ));
    }
}

#[test]
fn test_unparsable_text_treated_as_zero() -> anyhow::Result<()> {
    let expr = compose_scalar(
        "bitor",
        vec![lit(Value::varchar("not a number")), lit(Value::ubigint(6))],
    )?;
    assert_eq!(
        evaluate_expression(expr.as_ref(), Arc::new(ValuesRow::default()))?,
        Value::ubigint(0)
    );

    // Parsable text is read as a number
    let expr = compose_scalar(
        "bitor",
        vec![lit(Value::varchar("8")), lit(Value::ubigint(6))],
    )?;
    assert_eq!(
        evaluate_expression(expr.as_ref(), Arc::new(ValuesRow::default()))?,
        Value::ubigint(14)
    );
    Ok(())
}

#[test]
fn test_random_round_trips() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let row_def = Arc::new(RowDef::new(vec![
        FieldDef::new("u", TypeTag::UBigInt),
        FieldDef::new("d", TypeTag::Double),
        FieldDef::new("s", TypeTag::Varchar),
    ]));

    for _ in 0..200 {
        let u: u64 = rng.gen();
        let d = bits_to_double(rng.gen::<u64>());
        let len = rng.gen_range(0..32);
        let s: String = (0..len).map(|_| rng.gen_range('a'..='z')).collect();

        let row = RowData::encode(
            row_def.clone(),
            &[Value::ubigint(u), Value::Double(d), Value::varchar(s.clone())],
        )?;

        assert_eq!(row.value(0)?, Value::ubigint(u));
        match row.value(1)? {
            Value::Double(back) => assert_eq!(back.to_bits(), d.to_bits()),
            other => panic!("expected DOUBLE, got {:?}", other),
        }
        assert_eq!(row.value(2)?, Value::varchar(s));
    }
    Ok(())
}

#[test]
fn test_shared_expression_across_threads() -> anyhow::Result<()> {
    let expr: Arc<dyn Expression> = Arc::from(compose_scalar(
        "bitand",
        vec![
            Box::new(ColumnExpression::new(0, TypeTag::UBigInt)) as Box<dyn Expression>,
            lit(Value::ubigint(0xFF)),
        ],
    )?);

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || -> Result<(), ExpressionError> {
                let mut evaluation = expr.evaluation();
                for i in 0..100u64 {
                    let input = (t << 32) | (i * 3);
                    let row: Arc<dyn Row> = Arc::new(ValuesRow::new(vec![Value::ubigint(input)]));
                    evaluation.of(row);
                    assert_eq!(evaluation.eval()?, &Value::ubigint(input & 0xFF));
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("evaluation thread panicked")?;
    }
    Ok(())
}
