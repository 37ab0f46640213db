//! SQL schema of the incident database.
//!
//! The loader never creates or alters tables; this DDL documents the shape it
//! reads and builds fixture databases in tests.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS Municipios (
    id    INTEGER PRIMARY KEY,
    nome  TEXT NOT NULL,
    uf    TEXT             -- two-letter state code
);

CREATE TABLE IF NOT EXISTS Terras_Indigenas (
    id    INTEGER PRIMARY KEY,
    nome  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Povos (
    id    INTEGER PRIMARY KEY,
    nome  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Fontes (
    id    INTEGER PRIMARY KEY,
    nome  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Tipos_Violencia (
    id    INTEGER PRIMARY KEY,
    nome  TEXT NOT NULL
);

-- The fact table.
CREATE TABLE IF NOT EXISTS Incidentes (
    id                 INTEGER PRIMARY KEY,
    data               TEXT NOT NULL,   -- ISO 8601 date, optionally with time
    descricao          TEXT,
    municipio_id       INTEGER REFERENCES Municipios(id),
    terra_indigena_id  INTEGER REFERENCES Terras_Indigenas(id),
    fonte_id           INTEGER REFERENCES Fontes(id)
);

CREATE TABLE IF NOT EXISTS Vitimas (
    id            INTEGER PRIMARY KEY,
    incidente_id  INTEGER NOT NULL REFERENCES Incidentes(id),
    nome          TEXT,
    apelido       TEXT,
    idade         INTEGER,
    aldeia        TEXT,
    povo_id       INTEGER REFERENCES Povos(id)
);

CREATE TABLE IF NOT EXISTS Incidentes_Tipos_Violencia (
    incidente_id       INTEGER NOT NULL REFERENCES Incidentes(id),
    tipo_violencia_id  INTEGER NOT NULL REFERENCES Tipos_Violencia(id),
    PRIMARY KEY (incidente_id, tipo_violencia_id)
);

CREATE INDEX IF NOT EXISTS vitimas_incidente_idx ON Vitimas(incidente_id);
";

/// Incidents with their dimension labels joined in.
pub(crate) const SELECT_INCIDENTS: &str = "
SELECT
    i.id, i.data, i.descricao,
    m.nome AS municipio,
    m.uf,
    t.nome AS terra_indigena,
    f.nome AS fonte
FROM Incidentes i
LEFT JOIN Municipios       m ON m.id = i.municipio_id
LEFT JOIN Terras_Indigenas t ON t.id = i.terra_indigena_id
LEFT JOIN Fontes           f ON f.id = i.fonte_id
ORDER BY i.id";

pub(crate) const SELECT_VICTIMS: &str = "
SELECT
    v.id, v.incidente_id, v.nome, v.apelido, v.idade, v.aldeia,
    p.nome AS povo
FROM Vitimas v
LEFT JOIN Povos p ON p.id = v.povo_id
ORDER BY v.id";

pub(crate) const SELECT_TAGS: &str = "
SELECT it.incidente_id, tv.nome
FROM Incidentes_Tipos_Violencia it
JOIN Tipos_Violencia tv ON tv.id = it.tipo_violencia_id
ORDER BY it.incidente_id, tv.nome";
