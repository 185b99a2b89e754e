//! Built-in conversation the session starts from.

use colloquy_common::Turn;

const BRIEF: &str = "Context: you are a PostgreSQL 12+ specialist. You help people optimize \
SQL queries and answer DDL questions, working step by step, asking questions when needed \
and explaining why your version is more efficient.\n\
Question: write DDL for storing complete building information. Owner and address live in \
separate tables, primary keys are always named id, geometry uses PostGIS.";

const CLARIFY: &str = "Happy to design that schema. Before writing DDL, a few questions:\n\n\
1. Which building attributes do you need (floors, year built, type, ...)?\n\
2. Can a building have several addresses?\n\
3. How will the geometry be queried (radius searches, drawing, ...)?";

const ANSWERS: &str = "1: number of apartments and floors, year built, type (enum commercial, \
residential, mixed, private, rental), name, city id referencing a cities table, ground surface.\n\
2: yes, several addresses per building.\n\
3: a 2D point for location queries and a multipolygon shape for drawing on a map or in a GIS.";

const SCHEMA: &str = "```sql\n\
CREATE TYPE building_type AS ENUM ('commercial', 'residential', 'mixed', 'private', 'rental');\n\n\
CREATE TABLE buildings (\n\
    id SERIAL PRIMARY KEY,\n\
    name VARCHAR(255),\n\
    year_built INT,\n\
    type building_type NOT NULL,\n\
    num_apartments INT,\n\
    num_floors INT,\n\
    ground_surface REAL,\n\
    city_id INT REFERENCES cities(id),\n\
    position GEOGRAPHY(POINT, 4326),\n\
    shape GEOGRAPHY(MULTIPOLYGON, 4326)\n\
);\n\n\
CREATE TABLE addresses (\n\
    id SERIAL PRIMARY KEY,\n\
    building_id INT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,\n\
    street VARCHAR(255) NOT NULL,\n\
    house_number VARCHAR(50),\n\
    zip_code VARCHAR(20)\n\
);\n\n\
CREATE INDEX building_position_idx ON buildings USING GIST (position);\n\
CREATE INDEX building_shape_idx ON buildings USING GIST (shape);\n\
CREATE INDEX address_building_id_idx ON addresses (building_id);\n\
```\n\n\
The enum keeps types consistent and compact, the GIST indexes serve spatial queries, and \
addresses sit in their own table so a building can have any number of them.";

/// The SQL-specialist exchange: a brief, a clarifying question, the
/// answers, and the resulting schema.
pub fn sql_specialist() -> Vec<Turn> {
    vec![
        Turn::user(BRIEF),
        Turn::model(CLARIFY),
        Turn::user(ANSWERS),
        Turn::model(SCHEMA),
    ]
}
